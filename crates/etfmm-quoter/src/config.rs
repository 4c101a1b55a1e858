//! Quoting configuration.
//!
//! All prices are integer cents. The defaults are the contract values the
//! venue and the hedging logic were tuned for.

use etfmm_core::{Price, PriceBounds, Volume, MAXIMUM_ASK, MINIMUM_BID, TOP_LEVEL_COUNT};
use serde::{Deserialize, Serialize};

use crate::error::{QuoterError, QuoterResult};

/// Quoting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoterConfig {
    /// Order volume for the standard and skewed layers, and the position
    /// step per inventory skew tick.
    #[serde(default = "default_lot_size")]
    pub lot_size: u32,

    /// Position bound checked before placing a new order on either side.
    #[serde(default = "default_position_limit")]
    pub position_limit: i64,

    /// Minimum price increment in cents.
    #[serde(default = "default_tick_size")]
    pub tick_size: i64,

    /// Fixed volume for the aggressive (fill-and-kill) layer.
    #[serde(default = "default_aggressive_volume")]
    pub aggressive_volume: u32,

    /// How far inside the skewed layer's targets the aggressive layer quotes.
    #[serde(default = "default_aggressive_offset")]
    pub aggressive_offset: i64,

    /// ETF/future best-bid gap (cents) beyond which the spread skew applies.
    #[serde(default = "default_spread_threshold")]
    pub spread_threshold: i64,

    /// Spread skew magnitude in cents.
    #[serde(default = "default_spread_skew")]
    pub spread_skew: i64,

    /// Depth levels the standard layer shifts by when the depth signal fires.
    #[serde(default = "default_depth_shift")]
    pub depth_shift: i64,

    /// Best-price observations retained per history sequence.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Clear the aggressive layer's slot on a terminal status so it quotes
    /// again. Off by default: the layer then quotes each side once per session.
    #[serde(default)]
    pub rearm_aggressive_layer: bool,

    /// Lowest valid bid price on the venue.
    #[serde(default = "default_minimum_bid")]
    pub minimum_bid: i64,

    /// Highest valid ask price on the venue.
    #[serde(default = "default_maximum_ask")]
    pub maximum_ask: i64,
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            lot_size: default_lot_size(),
            position_limit: default_position_limit(),
            tick_size: default_tick_size(),
            aggressive_volume: default_aggressive_volume(),
            aggressive_offset: default_aggressive_offset(),
            spread_threshold: default_spread_threshold(),
            spread_skew: default_spread_skew(),
            depth_shift: default_depth_shift(),
            history_capacity: default_history_capacity(),
            rearm_aggressive_layer: false,
            minimum_bid: default_minimum_bid(),
            maximum_ask: default_maximum_ask(),
        }
    }
}

impl QuoterConfig {
    /// Reject settings the quoting logic cannot run with.
    pub fn validate(&self) -> QuoterResult<()> {
        if self.lot_size == 0 {
            return Err(QuoterError::InvalidConfig("lot_size must be > 0".into()));
        }
        if self.tick_size <= 0 {
            return Err(QuoterError::InvalidConfig("tick_size must be > 0".into()));
        }
        if self.position_limit <= 0 {
            return Err(QuoterError::InvalidConfig(
                "position_limit must be > 0".into(),
            ));
        }
        if self.aggressive_volume == 0 {
            return Err(QuoterError::InvalidConfig(
                "aggressive_volume must be > 0".into(),
            ));
        }
        if self.history_capacity < 3 {
            return Err(QuoterError::InvalidConfig(format!(
                "history_capacity must be >= 3, got {}",
                self.history_capacity
            )));
        }
        // Standard layer reads level 2 + shift; both must stay inside the top levels.
        let centre = (TOP_LEVEL_COUNT as i64 - 1) / 2;
        if self.depth_shift < 0 || self.depth_shift > centre {
            return Err(QuoterError::InvalidConfig(format!(
                "depth_shift must be within 0..={centre}, got {}",
                self.depth_shift
            )));
        }
        if self.minimum_bid <= 0 || self.minimum_bid >= self.maximum_ask {
            return Err(QuoterError::InvalidConfig(format!(
                "invalid price bounds: minimum_bid={} maximum_ask={}",
                self.minimum_bid, self.maximum_ask
            )));
        }
        Ok(())
    }

    pub fn lot(&self) -> Volume {
        Volume::new(self.lot_size)
    }

    pub fn tick(&self) -> Price {
        Price::new(self.tick_size)
    }

    pub fn price_bounds(&self) -> PriceBounds {
        PriceBounds::new(Price::new(self.minimum_bid), Price::new(self.maximum_ask))
    }
}

fn default_lot_size() -> u32 {
    25
}
fn default_position_limit() -> i64 {
    50
}
fn default_tick_size() -> i64 {
    100 // 1.00 in cents
}
fn default_aggressive_volume() -> u32 {
    20
}
fn default_aggressive_offset() -> i64 {
    100
}
fn default_spread_threshold() -> i64 {
    200
}
fn default_spread_skew() -> i64 {
    100
}
fn default_depth_shift() -> i64 {
    2
}
fn default_history_capacity() -> usize {
    3 // last and second-to-last are the only reads
}
fn default_minimum_bid() -> i64 {
    MINIMUM_BID
}
fn default_maximum_ask() -> i64 {
    MAXIMUM_ASK
}
