use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::external::CompletionTransport;
use super::service::{EvaluationRequest, EvaluationServiceError, ProposalEvaluationService};
use crate::credentials::{CredentialStore, CredentialStoreError};

#[derive(Debug, Deserialize)]
pub struct CredentialPayload {
    pub credential: String,
}

/// Router builder exposing evaluation and credential endpoints.
pub fn evaluation_router<S, T>(service: Arc<ProposalEvaluationService<S, T>>) -> Router
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(evaluate_handler::<S, T>))
        .route(
            "/api/v1/credentials/:service",
            get(credential_status_handler::<S, T>).put(save_credential_handler::<S, T>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<S, T>(
    State(service): State<Arc<ProposalEvaluationService<S, T>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    match service.evaluate(request).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(EvaluationServiceError::Batch(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(EvaluationServiceError::Weights(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn save_credential_handler<S, T>(
    State(service): State<Arc<ProposalEvaluationService<S, T>>>,
    Path(service_id): Path<String>,
    axum::Json(payload): axum::Json<CredentialPayload>,
) -> Response
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    match service.save_credential(&service_id, &payload.credential).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(EvaluationServiceError::Credentials(CredentialStoreError::EmptyCredential)) => {
            let payload = json!({ "error": "credential cannot be empty" });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn credential_status_handler<S, T>(
    State(service): State<Arc<ProposalEvaluationService<S, T>>>,
    Path(service_id): Path<String>,
) -> Response
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    match service.credential_configured(&service_id).await {
        Ok(configured) => {
            let payload = json!({ "service": service_id, "configured": configured });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
