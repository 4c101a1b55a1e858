//! Prometheus metrics for the market maker.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge_vec, Counter, CounterVec, Encoder,
    GaugeVec, TextEncoder,
};

use crate::error::TelemetryResult;

/// Quotes inserted.
/// Labels: side (buy/sell), lifespan (good_for_day/fill_and_kill)
pub static ORDERS_INSERTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_orders_inserted_total",
        "Total quote inserts sent",
        &["side", "lifespan"]
    )
    .unwrap()
});

/// Quotes cancelled after their target moved.
pub static CANCELS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("etfmm_cancels_total", "Total quote cancels sent").unwrap()
});

/// Hedge orders sent.
pub static HEDGES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("etfmm_hedges_total", "Total hedge orders sent", &["side"]).unwrap()
});

/// Hedged volume in lots.
pub static HEDGED_VOLUME_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_hedged_volume_total",
        "Total hedged volume in lots",
        &["side"]
    )
    .unwrap()
});

/// Fills on our quotes, by the side of the quote.
pub static FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("etfmm_fills_total", "Total quote fills", &["side"]).unwrap()
});

/// Inbound notifications by kind.
pub static VENUE_EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_venue_events_total",
        "Total inbound venue notifications",
        &["kind"]
    )
    .unwrap()
});

/// Venue error notifications.
pub static VENUE_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("etfmm_venue_errors_total", "Total venue error notifications").unwrap()
});

/// Book updates rejected as malformed.
pub static REJECTED_SNAPSHOTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_rejected_snapshots_total",
        "Total book updates rejected as malformed",
        &["instrument"]
    )
    .unwrap()
});

/// Signed position per quote layer, in lots.
pub static POSITION: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "etfmm_position",
        "Signed position per quote layer in lots",
        &["layer"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    pub fn order_inserted(side: &str, lifespan: &str) {
        ORDERS_INSERTED_TOTAL
            .with_label_values(&[side, lifespan])
            .inc();
    }

    pub fn order_cancelled() {
        CANCELS_TOTAL.inc();
    }

    /// Record a hedge order and its volume.
    pub fn hedge_sent(side: &str, volume: u32) {
        HEDGES_TOTAL.with_label_values(&[side]).inc();
        HEDGED_VOLUME_TOTAL
            .with_label_values(&[side])
            .inc_by(f64::from(volume));
    }

    pub fn fill(side: &str) {
        FILLS_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn venue_event(kind: &str) {
        VENUE_EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn venue_error() {
        VENUE_ERRORS_TOTAL.inc();
    }

    pub fn snapshot_rejected(instrument: &str) {
        REJECTED_SNAPSHOTS_TOTAL
            .with_label_values(&[instrument])
            .inc();
    }

    pub fn position(layer: &str, position: i64) {
        POSITION.with_label_values(&[layer]).set(position as f64);
    }

    /// Render the default registry in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
