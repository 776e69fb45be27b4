use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::{json, Value};

use crate::config::ScoringConfig;
use crate::credentials::SqliteCredentialStore;
use crate::evaluation::{
    CompletionTransport, EvaluationEngine, ExternalScoreError, ExternalScorer, ProposalDocument,
    ProposalEvaluationService, ScoreResult, ScoreSource, SectionExtractor,
};

pub(super) const SERVICE_ID: &str = "google_gemini";

#[derive(Clone, Debug)]
pub(super) enum Reply {
    Json(Value),
    Fail(String),
    Hang,
}

/// Transport that answers prompts from a script instead of the network.
#[derive(Clone)]
pub(super) struct ScriptedTransport {
    rules: Vec<(String, Reply)>,
    fallback: Reply,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub(super) fn replying(text: &str) -> Self {
        Self::with_fallback(Reply::Json(model_reply(text)))
    }

    pub(super) fn with_fallback(fallback: Reply) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts containing `needle` get `reply` instead of the fallback.
    pub(super) fn with_rule(mut self, needle: &str, reply: Reply) -> Self {
        self.rules.push((needle.to_string(), reply));
        self
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

impl CompletionTransport for ScriptedTransport {
    async fn complete(&self, prompt: &str, _credential: &str) -> Result<Value, ExternalScoreError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Json(value) => Ok(value),
            Reply::Fail(message) => Err(ExternalScoreError::Transport(message)),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub(super) fn model_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

pub(super) fn engine_with(
    transport: ScriptedTransport,
    timeout: Duration,
) -> EvaluationEngine<ScriptedTransport> {
    EvaluationEngine::new(
        SectionExtractor::default(),
        ExternalScorer::new(transport, timeout),
    )
}

pub(super) fn engine(transport: ScriptedTransport) -> EvaluationEngine<ScriptedTransport> {
    engine_with(transport, Duration::from_secs(5))
}

pub(super) fn scoring_config(weights_path: PathBuf) -> ScoringConfig {
    ScoringConfig {
        weights_path,
        endpoint: "http://127.0.0.1:9/unused".to_string(),
        timeout: Duration::from_secs(5),
        service_id: SERVICE_ID.to_string(),
    }
}

pub(super) fn build_service(
    transport: ScriptedTransport,
) -> (
    ProposalEvaluationService<SqliteCredentialStore, ScriptedTransport>,
    Arc<SqliteCredentialStore>,
) {
    let store = Arc::new(SqliteCredentialStore::open_in_memory().expect("store opens"));
    let config = scoring_config(PathBuf::from("does/not/exist/weights_config.json"));
    let service = ProposalEvaluationService::new(engine(transport), store.clone(), &config);
    (service, store)
}

pub(super) fn vendor_a() -> ProposalDocument {
    ProposalDocument::new(
        "vendor_a.pdf",
        "Cost: $1,000\nTechnical Approach: quality assured delivery\nPast Performance: reliable partner",
    )
}

pub(super) fn vendor_b() -> ProposalDocument {
    ProposalDocument::new(
        "vendor_b.pdf",
        "Cost: $3,000\nTechnical Approach: standard delivery\nPast Performance: none",
    )
}

pub(super) fn scores(final_score: f64) -> ScoreResult {
    ScoreResult {
        cost_score: 0.0,
        technical_merit_score: 0.0,
        past_performance_score: 0.0,
        final_score,
        technical_merit_source: ScoreSource::Heuristic,
        past_performance_source: ScoreSource::Heuristic,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
