//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quoter error: {0}")]
    Quoter(#[from] etfmm_quoter::QuoterError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] etfmm_telemetry::TelemetryError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
