//! Error types for etfmm-core.

use thiserror::Error;

use crate::instrument::Instrument;

/// Core error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Shallow book for {instrument}: {field} has {depth} levels, need {required}")]
    ShallowBook {
        instrument: Instrument,
        field: &'static str,
        depth: usize,
        required: usize,
    },

    #[error("Depth level {0} out of range")]
    LevelOutOfRange(usize),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
