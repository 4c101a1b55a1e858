//! Inventory skew and position limits.
//!
//! A layer's position moves its quotes by one tick per full lot held, in the
//! direction that unwinds it: long inventory lowers both bid and ask, short
//! inventory raises them.

use etfmm_core::{Price, Side};

/// Price offset for a layer holding `position` lots.
///
/// `-floor(position / lot_size) * tick`. Floor division rounds toward
/// negative infinity, so a short of 1 lot already skews quotes up a tick.
pub fn inventory_adjustment(position: i64, lot_size: u32, tick: Price) -> Price {
    let lots = position.div_euclid(i64::from(lot_size.max(1)));
    Price::new(-lots * tick.cents())
}

/// Symmetric position bound, checked before each new order.
///
/// Fills are never clipped, so a position can run past the bound; the check
/// only stops further orders on the side that would extend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionLimit {
    limit: i64,
}

impl PositionLimit {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Strictly below the long bound.
    pub fn can_buy(&self, position: i64) -> bool {
        position < self.limit
    }

    /// Strictly above the short bound.
    pub fn can_sell(&self, position: i64) -> bool {
        position > -self.limit
    }

    pub fn allows(&self, side: Side, position: i64) -> bool {
        match side {
            Side::Buy => self.can_buy(position),
            Side::Sell => self.can_sell(position),
        }
    }
}
