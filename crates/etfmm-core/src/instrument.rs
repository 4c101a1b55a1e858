//! Traded instruments and venue price limits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::price::Price;

/// Lowest price the venue accepts on a bid, in cents.
pub const MINIMUM_BID: i64 = 1;

/// Highest price the venue accepts on an ask, in cents.
pub const MAXIMUM_ASK: i64 = (1 << 31) - 1;

/// The two instruments in the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// The future. Its book updates drive quoting.
    Future,
    /// The ETF tracking the future. Quotes are sent on it; hedges go to the future.
    Etf,
}

impl Instrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Etf => "etf",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Venue-defined valid price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub minimum_bid: Price,
    pub maximum_ask: Price,
}

impl PriceBounds {
    pub fn new(minimum_bid: Price, maximum_ask: Price) -> Self {
        Self {
            minimum_bid,
            maximum_ask,
        }
    }

    /// Hedge sell price: the first tick strictly above the minimum bid.
    pub fn min_bid_nearest_tick(&self, tick_size: Price) -> Price {
        (self.minimum_bid + tick_size).floor_to_tick(tick_size)
    }

    /// Hedge buy price: the last tick at or below the maximum ask.
    pub fn max_ask_nearest_tick(&self, tick_size: Price) -> Price {
        self.maximum_ask.floor_to_tick(tick_size)
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self::new(Price::new(MINIMUM_BID), Price::new(MAXIMUM_ASK))
    }
}
