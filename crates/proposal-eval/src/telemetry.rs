use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// HTTP client internals log every request at debug; keep them at warn unless
/// `RUST_LOG` asks otherwise.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Chooses the active filter: a non-blank `RUST_LOG` wins outright, otherwise
/// the configured level applies with HTTP client noise turned down.
pub fn log_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    let (value, directives) = match rust_log.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => (raw.to_string(), raw.to_string()),
        None => (
            config.log_level.clone(),
            format!("{},{QUIET_DEPENDENCIES}", config.log_level.trim()),
        ),
    };

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter { value, source })
}

/// Installs the global compact subscriber for the server and CLI.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn configured_level_quiets_http_clients() {
        let filter = log_filter(None, &config("debug")).expect("filter builds");

        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter =
            log_filter(Some("proposal_eval=trace"), &config("info")).expect("filter builds");

        let rendered = filter.to_string();
        assert!(rendered.contains("proposal_eval=trace"));
        assert!(!rendered.contains("reqwest"));
    }

    #[test]
    fn blank_rust_log_falls_back_to_config() {
        let filter = log_filter(Some("  "), &config("warn")).expect("filter builds");

        assert!(filter.to_string().contains("reqwest=warn"));
    }

    #[test]
    fn rejects_unparseable_filter() {
        match log_filter(None, &config("proposal_eval=verbose")) {
            Err(TelemetryError::EnvFilter { value, .. }) => {
                assert_eq!(value, "proposal_eval=verbose")
            }
            other => panic!("expected env filter error, got {other:?}"),
        }

        match log_filter(Some("proposal_eval=loud"), &config("info")) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "proposal_eval=loud"),
            other => panic!("expected env filter error, got {other:?}"),
        }
    }
}
