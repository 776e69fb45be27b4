use crate::config::ConfigError;
use crate::credentials::CredentialStoreError;
use crate::evaluation::{
    EvaluationServiceError, ExternalScoreError, ReportExportError, WeightConfigError,
};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Evaluation(EvaluationServiceError),
    Credentials(CredentialStoreError),
    Scorer(ExternalScoreError),
    Export(ReportExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Evaluation(err) => write!(f, "evaluation error: {}", err),
            AppError::Credentials(err) => write!(f, "credential error: {}", err),
            AppError::Scorer(err) => write!(f, "scorer setup error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Evaluation(err) => Some(err),
            AppError::Credentials(err) => Some(err),
            AppError::Scorer(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Evaluation(EvaluationServiceError::Batch(_))
            | AppError::Evaluation(EvaluationServiceError::Weights(_))
            | AppError::Credentials(CredentialStoreError::EmptyCredential) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Evaluation(_)
            | AppError::Credentials(_)
            | AppError::Scorer(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<EvaluationServiceError> for AppError {
    fn from(value: EvaluationServiceError) -> Self {
        Self::Evaluation(value)
    }
}

impl From<WeightConfigError> for AppError {
    fn from(value: WeightConfigError) -> Self {
        Self::Evaluation(EvaluationServiceError::Weights(value))
    }
}

impl From<CredentialStoreError> for AppError {
    fn from(value: CredentialStoreError) -> Self {
        Self::Credentials(value)
    }
}

impl From<ExternalScoreError> for AppError {
    fn from(value: ExternalScoreError) -> Self {
        Self::Scorer(value)
    }
}

impl From<ReportExportError> for AppError {
    fn from(value: ReportExportError) -> Self {
        Self::Export(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::BatchError;

    #[test]
    fn batch_size_violations_map_to_bad_request() {
        let err = AppError::from(EvaluationServiceError::Batch(BatchError::OutOfRange {
            count: 4,
            min: 2,
            max: 3,
        }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_map_to_internal_error() {
        let err = AppError::from(CredentialStoreError::Poisoned);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
