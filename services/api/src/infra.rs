use metrics_exporter_prometheus::PrometheusHandle;
use proposal_eval::config::AppConfig;
use proposal_eval::credentials::SqliteCredentialStore;
use proposal_eval::error::AppError;
use proposal_eval::evaluation::{
    EvaluationEngine, HttpCompletionTransport, ProposalDocument, ProposalEvaluationService,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type EvaluationService =
    ProposalEvaluationService<SqliteCredentialStore, HttpCompletionTransport>;

/// Wires the SQLite credential store and HTTP scorer from configuration.
pub(crate) fn build_evaluation_service(config: &AppConfig) -> Result<EvaluationService, AppError> {
    let store = Arc::new(SqliteCredentialStore::open(&config.credentials.db_path)?);
    let engine = EvaluationEngine::from_config(&config.scoring)?;
    Ok(ProposalEvaluationService::new(
        engine,
        store,
        &config.scoring,
    ))
}

/// Reads already-extracted proposal text. The label is the file name so
/// results line up with what the user passed in.
pub(crate) fn load_document(path: &Path) -> Result<ProposalDocument, AppError> {
    let bytes = std::fs::read(path)?;
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ProposalDocument::from_bytes(label, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_document_labels_by_file_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vendor_a.txt");
        let mut file = std::fs::File::create(&path).expect("create proposal");
        file.write_all(b"Cost: $1,000\xff").expect("write proposal");

        let document = load_document(&path).expect("document loads");

        assert_eq!(document.label(), "vendor_a.txt");
        assert!(document.text().starts_with("Cost: $1,000"));
        assert!(document.text().ends_with('\u{FFFD}'));
    }

    #[test]
    fn missing_document_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");

        let result = load_document(&dir.path().join("absent.txt"));

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
