use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use super::config::{WeightConfig, WeightConfigError};
use super::domain::{BatchError, DocumentBatch, ProposalDocument};
use super::engine::EvaluationEngine;
use super::external::CompletionTransport;
use super::report::{CandidateInsight, EvaluationReport, InsightOutcome};
use crate::config::ScoringConfig;
use crate::credentials::{CredentialStore, CredentialStoreError};

/// Inbound evaluation request. Weights default to the configured weights file.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub documents: Vec<ProposalDocument>,
    #[serde(default)]
    pub weights: Option<WeightConfig>,
    #[serde(default)]
    pub use_external: bool,
    #[serde(default)]
    pub include_insights: bool,
}

impl EvaluationRequest {
    pub fn new(documents: Vec<ProposalDocument>) -> Self {
        Self {
            documents,
            weights: None,
            use_external: false,
            include_insights: false,
        }
    }
}

/// Service composing the engine, credential store, and weight source.
pub struct ProposalEvaluationService<S, T> {
    engine: Arc<EvaluationEngine<T>>,
    credentials: Arc<S>,
    weights_path: PathBuf,
    service_id: String,
}

impl<S, T> ProposalEvaluationService<S, T>
where
    S: CredentialStore + 'static,
    T: CompletionTransport + 'static,
{
    pub fn new(engine: EvaluationEngine<T>, credentials: Arc<S>, scoring: &ScoringConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            credentials,
            weights_path: scoring.weights_path.clone(),
            service_id: scoring.service_id.clone(),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Validate the batch, resolve weights and credential, then rank.
    pub async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationReport, EvaluationServiceError> {
        let EvaluationRequest {
            documents,
            weights,
            use_external,
            include_insights,
        } = request;

        let batch = DocumentBatch::new(documents)?;

        let weights = match weights {
            Some(weights) => {
                weights.validate()?;
                weights
            }
            None => {
                let path = self.weights_path.clone();
                run_blocking(move || WeightConfig::load(path)).await?
            }
        };

        let credential = if use_external {
            self.lookup_credential().await
        } else {
            None
        };

        let results = self
            .engine
            .evaluate(&batch, &weights, use_external, credential.as_deref())
            .await;

        let insights = match credential.as_deref() {
            Some(credential) if include_insights => self.collect_insights(&batch, credential).await,
            _ => Vec::new(),
        };

        Ok(EvaluationReport {
            evaluated_at: Utc::now(),
            weights,
            used_external: credential.is_some(),
            results,
            insights,
        })
    }

    pub async fn save_credential(
        &self,
        service_id: &str,
        credential: &str,
    ) -> Result<(), EvaluationServiceError> {
        let store = Arc::clone(&self.credentials);
        let service_id = service_id.to_string();
        let credential = credential.to_string();
        run_blocking(move || store.set(&service_id, &credential)).await??;
        Ok(())
    }

    pub async fn credential_configured(
        &self,
        service_id: &str,
    ) -> Result<bool, EvaluationServiceError> {
        let store = Arc::clone(&self.credentials);
        let service_id = service_id.to_string();
        let credential = run_blocking(move || store.get(&service_id)).await??;
        Ok(credential.is_some())
    }

    async fn lookup_credential(&self) -> Option<String> {
        let store = Arc::clone(&self.credentials);
        let service_id = self.service_id.clone();
        let lookup = run_blocking(move || store.get(&service_id))
            .await
            .and_then(|found| found.map_err(EvaluationServiceError::from));
        match lookup {
            Ok(credential) => credential.filter(|value| !value.trim().is_empty()),
            Err(err) => {
                warn!(service = %self.service_id, error = %err, "credential lookup failed");
                None
            }
        }
    }

    async fn collect_insights(
        &self,
        batch: &DocumentBatch,
        credential: &str,
    ) -> Vec<CandidateInsight> {
        let mut insights = Vec::with_capacity(batch.len());
        for document in batch.documents() {
            let sections = self.engine.extractor().extract(document.text());
            let outcome = match self.engine.external().insights(&sections, credential).await {
                Ok(text) => InsightOutcome::Summary { text },
                Err(err) => {
                    warn!(candidate = document.label(), error = %err, "insights unavailable");
                    InsightOutcome::Unavailable {
                        reason: err.to_string(),
                    }
                }
            };
            insights.push(CandidateInsight {
                candidate_label: document.label().to_string(),
                outcome,
            });
        }
        insights
    }
}

/// Store and weights-file I/O is synchronous; keep it off the async workers.
async fn run_blocking<R, F>(task: F) -> Result<R, EvaluationServiceError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await?)
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Weights(#[from] WeightConfigError),
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
    #[error("blocking storage task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}
