//! Order book depth snapshots.
//!
//! A snapshot carries the top levels of one instrument's book, best price
//! first. Snapshots are transient: the engine reads the best prices into
//! its history and the deeper levels into quote targets, then drops it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::instrument::Instrument;
use crate::price::{Price, Volume};

/// Number of depth levels the venue publishes and the quoter relies on.
pub const TOP_LEVEL_COUNT: usize = 5;

/// One book update (or trade tick summary) for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub instrument: Instrument,
    /// Monotonic per-instrument sequence number.
    pub sequence: u64,
    pub ask_prices: Vec<Price>,
    pub ask_volumes: Vec<Volume>,
    pub bid_prices: Vec<Price>,
    pub bid_volumes: Vec<Volume>,
}

impl BookSnapshot {
    pub fn new(
        instrument: Instrument,
        sequence: u64,
        ask_prices: Vec<Price>,
        ask_volumes: Vec<Volume>,
        bid_prices: Vec<Price>,
        bid_volumes: Vec<Volume>,
    ) -> Self {
        Self {
            instrument,
            sequence,
            ask_prices,
            ask_volumes,
            bid_prices,
            bid_volumes,
        }
    }

    /// Check that every array carries at least `TOP_LEVEL_COUNT` levels.
    ///
    /// Quote targets index up to level 4, so a shallower book is rejected
    /// before any state is touched.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("ask_prices", self.ask_prices.len()),
            ("ask_volumes", self.ask_volumes.len()),
            ("bid_prices", self.bid_prices.len()),
            ("bid_volumes", self.bid_volumes.len()),
        ];
        for (field, depth) in fields {
            if depth < TOP_LEVEL_COUNT {
                return Err(CoreError::ShallowBook {
                    instrument: self.instrument,
                    field,
                    depth,
                    required: TOP_LEVEL_COUNT,
                });
            }
        }
        Ok(())
    }

    /// Best (level 0) bid price, zero on an empty book.
    pub fn best_bid(&self) -> Price {
        self.bid_prices.first().copied().unwrap_or(Price::ZERO)
    }

    /// Best (level 0) ask price, zero on an empty book.
    pub fn best_ask(&self) -> Price {
        self.ask_prices.first().copied().unwrap_or(Price::ZERO)
    }

    /// Bid price at a depth level.
    pub fn bid_at(&self, level: usize) -> Result<Price> {
        self.bid_prices
            .get(level)
            .copied()
            .ok_or(CoreError::LevelOutOfRange(level))
    }

    /// Ask price at a depth level.
    pub fn ask_at(&self, level: usize) -> Result<Price> {
        self.ask_prices
            .get(level)
            .copied()
            .ok_or(CoreError::LevelOutOfRange(level))
    }
}
