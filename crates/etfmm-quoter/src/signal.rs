//! Signal derivation from the incoming future snapshot and price history.
//!
//! Runs before the snapshot is appended to history, so "last" means the
//! previous future/ETF update and "previous" the one before that.

use etfmm_core::{BookSnapshot, Price};
use tracing::debug;

use crate::config::QuoterConfig;
use crate::history::MarketHistory;

/// Signals feeding the quote layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    /// Signed depth-level shift for the standard layer (`x`).
    pub depth_shift: i64,
    /// Price offset for the skewed layer (`y`).
    pub spread_skew: Price,
}

/// Derive both signals for a future update.
pub fn derive_signals(
    snapshot: &BookSnapshot,
    history: &MarketHistory,
    config: &QuoterConfig,
) -> Signals {
    let signals = Signals {
        depth_shift: depth_shift(snapshot.best_ask(), history, config.depth_shift),
        spread_skew: spread_skew(history, config),
    };
    debug!(
        depth_shift = signals.depth_shift,
        spread_skew = %signals.spread_skew,
        "Signals derived"
    );
    signals
}

/// Depth-shift signal.
///
/// Fires when the future ask is climbing above an ETF ask it already led and
/// the future bid had crossed the ETF ask one update earlier. The upward
/// branch of this rule shares the exact same condition and is always
/// superseded, so the signal is either `-shift` or zero.
pub fn depth_shift(current_future_ask: Price, history: &MarketHistory, shift: i64) -> i64 {
    let future_ask = history.future_ask().last();
    let etf_ask = history.etf_ask().last();
    let rising = current_future_ask > future_ask && future_ask > etf_ask;
    let crossed = history.future_bid().previous() > history.etf_ask().previous();
    if rising && crossed {
        -shift
    } else {
        0
    }
}

/// Spread-skew signal.
///
/// When the last ETF best bid sits more than `spread_threshold` above the
/// last future best bid, quotes move down by `spread_skew`; when it sits that
/// far below, they move up.
pub fn spread_skew(history: &MarketHistory, config: &QuoterConfig) -> Price {
    let gap = history.etf_bid().last() - history.future_bid().last();
    if gap.cents() > config.spread_threshold {
        Price::new(-config.spread_skew)
    } else if gap.cents() < -config.spread_threshold {
        Price::new(config.spread_skew)
    } else {
        Price::ZERO
    }
}
