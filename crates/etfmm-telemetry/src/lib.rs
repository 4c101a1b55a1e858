//! Prometheus metrics and structured logging for the market maker.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus counters for quotes, cancels, hedges, fills and venue errors
//! - Per-layer position gauges

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
