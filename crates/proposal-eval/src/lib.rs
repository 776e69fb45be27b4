pub mod config;
pub mod credentials;
pub mod error;
pub mod evaluation;
pub mod telemetry;
