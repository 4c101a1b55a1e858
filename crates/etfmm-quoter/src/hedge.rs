//! Hedging fills back onto the future.
//!
//! Every fill on a tracked quote moves all three layer positions together
//! and sends an offsetting order priced at the far end of the venue's valid
//! range, so it crosses whatever is resting.

use etfmm_core::{OrderId, Price, Side, Volume};
use tracing::{info, warn};

use crate::config::QuoterConfig;
use crate::gateway::OrderGateway;
use crate::lifecycle::OrderLifecycle;

/// A hedge order that was sent for a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HedgeOrder {
    pub order_id: OrderId,
    /// Side of the quote that filled.
    pub filled_side: Side,
    /// Side of the hedge (opposite of the fill).
    pub side: Side,
    pub price: Price,
    pub volume: Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HedgeController {
    sell_price: Price,
    buy_price: Price,
}

impl HedgeController {
    pub fn new(config: &QuoterConfig) -> Self {
        let bounds = config.price_bounds();
        let tick = config.tick();
        Self {
            sell_price: bounds.min_bid_nearest_tick(tick),
            buy_price: bounds.max_ask_nearest_tick(tick),
        }
    }

    /// Price a hedge on `side` is sent at.
    pub fn price(&self, side: Side) -> Price {
        match side {
            Side::Buy => self.buy_price,
            Side::Sell => self.sell_price,
        }
    }

    /// Apply a fill to the layer positions and hedge it.
    ///
    /// Returns `None` when the identifier is not tracked on either side; the
    /// fill is then ignored.
    pub fn on_order_filled<G: OrderGateway + ?Sized>(
        &self,
        lifecycle: &mut OrderLifecycle,
        order_id: OrderId,
        price: Price,
        volume: Volume,
        gateway: &mut G,
    ) -> Option<HedgeOrder> {
        let Some(filled_side) = lifecycle.side_of(order_id) else {
            warn!(
                order_id = order_id.raw(),
                price = %price,
                volume = %volume,
                "Fill for untracked order ignored"
            );
            return None;
        };

        lifecycle.apply_fill_all(filled_side, volume);

        let side = filled_side.opposite();
        let hedge = HedgeOrder {
            order_id: lifecycle.next_order_id(),
            filled_side,
            side,
            price: self.price(side),
            volume,
        };
        info!(
            filled_order_id = order_id.raw(),
            fill_price = %price,
            hedge_order_id = hedge.order_id.raw(),
            side = %hedge.side,
            price = %hedge.price,
            volume = %hedge.volume,
            positions = ?lifecycle.positions(),
            "Hedging fill"
        );
        gateway.hedge_order(hedge.order_id, hedge.side, hedge.price, hedge.volume);
        Some(hedge)
    }
}
