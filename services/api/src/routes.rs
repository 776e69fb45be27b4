use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use proposal_eval::credentials::CredentialStore;
use proposal_eval::evaluation::{
    evaluation_router, CompletionTransport, ProposalEvaluationService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_evaluation_routes<S, T>(
    service: Arc<ProposalEvaluationService<S, T>>,
) -> axum::Router
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    evaluation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use proposal_eval::config::ScoringConfig;
    use proposal_eval::credentials::SqliteCredentialStore;
    use proposal_eval::evaluation::{
        EvaluationEngine, ExternalScorer, HttpCompletionTransport, SectionExtractor,
    };
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let scoring = ScoringConfig {
            weights_path: PathBuf::from("does/not/exist.json"),
            endpoint: "http://127.0.0.1:9/unused".to_string(),
            timeout: Duration::from_secs(1),
            service_id: "google_gemini".to_string(),
        };
        let transport = HttpCompletionTransport::new(scoring.endpoint.clone(), scoring.timeout)
            .expect("client builds");
        let engine = EvaluationEngine::new(
            SectionExtractor::default(),
            ExternalScorer::new(transport, scoring.timeout),
        );
        let store = Arc::new(SqliteCredentialStore::open_in_memory().expect("store opens"));
        let service = Arc::new(ProposalEvaluationService::new(engine, store, &scoring));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_evaluation_routes(service).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router response")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = get(app(true), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_tracks_startup_flag() {
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_exposed_as_prometheus_text() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn evaluation_routes_are_mounted() {
        let response = get(app(true), "/api/v1/credentials/google_gemini").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
