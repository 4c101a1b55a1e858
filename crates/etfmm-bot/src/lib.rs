//! Replay host for the future/ETF market maker.
//!
//! Feeds recorded venue notifications through the quoting engine:
//! - Reads JSON-lines `VenueEvent`s from a file or stdin
//! - Hands them to a single engine task over a bounded channel
//! - Writes every emitted `OrderCommand` as a JSON line

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
