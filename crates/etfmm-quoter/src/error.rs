//! Quoter error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoterError {
    #[error("Rejected snapshot: {0}")]
    Snapshot(#[from] etfmm_core::CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type QuoterResult<T> = Result<T, QuoterError>;
