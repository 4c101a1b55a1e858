//! Order lifecycle: reconciling layer targets against live orders.
//!
//! Per future update the manager walks the layers in a fixed order:
//! 1. Aggressive layer inserts (bid, then ask)
//! 2. Cancels for stale standard/skewed quotes (bids first, then asks)
//! 3. Inserts for empty standard/skewed slots (bids first, then asks)
//!
//! Identifiers are assigned at insert time from a single sequence, so this
//! order also fixes which order gets which id. Side membership is tracked in
//! two sets because fills and statuses do not echo the side back.

use std::collections::HashSet;

use etfmm_core::{OrderId, OrderIdSequence, Price, Side, Volume};
use tracing::{debug, info};

use crate::config::QuoterConfig;
use crate::gateway::OrderGateway;
use crate::inventory::PositionLimit;
use crate::layer::{LayerKind, LayerTargets, QuoteLayer};

/// Layers that cancel and replace resting quotes, in walk order.
const RESTING_LAYERS: [LayerKind; 2] = [LayerKind::Standard, LayerKind::Skewed];

/// Order-side walk order.
const SIDES: [Side; 2] = [Side::Buy, Side::Sell];

#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    layers: [QuoteLayer; 3],
    bids: HashSet<OrderId>,
    asks: HashSet<OrderId>,
    ids: OrderIdSequence,
    limit: PositionLimit,
    volumes: [Volume; 3],
    rearm_aggressive: bool,
}

impl OrderLifecycle {
    pub fn new(config: &QuoterConfig) -> Self {
        Self {
            layers: LayerKind::ALL.map(QuoteLayer::new),
            bids: HashSet::new(),
            asks: HashSet::new(),
            ids: OrderIdSequence::new(),
            limit: PositionLimit::new(config.position_limit),
            volumes: LayerKind::ALL.map(|kind| kind.volume(config)),
            rearm_aggressive: config.rearm_aggressive_layer,
        }
    }

    pub fn layer(&self, kind: LayerKind) -> &QuoteLayer {
        &self.layers[kind.index()]
    }

    /// Positions of all layers in `LayerKind::ALL` order.
    pub fn positions(&self) -> [i64; 3] {
        LayerKind::ALL.map(|kind| self.layer(kind).position())
    }

    pub fn is_bid(&self, order_id: OrderId) -> bool {
        self.bids.contains(&order_id)
    }

    pub fn is_ask(&self, order_id: OrderId) -> bool {
        self.asks.contains(&order_id)
    }

    /// Side an identifier was inserted on, if it is still tracked.
    pub fn side_of(&self, order_id: OrderId) -> Option<Side> {
        if self.is_bid(order_id) {
            Some(Side::Buy)
        } else if self.is_ask(order_id) {
            Some(Side::Sell)
        } else {
            None
        }
    }

    /// Number of identifiers still tracked on either side.
    pub fn tracked(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Draw the next identifier. Hedges share the quote sequence.
    pub fn next_order_id(&mut self) -> OrderId {
        self.ids.next_id()
    }

    pub fn issued(&self) -> u64 {
        self.ids.issued()
    }

    /// Emit the cancels and inserts that move every layer to `targets`.
    pub fn reconcile<G: OrderGateway + ?Sized>(
        &mut self,
        targets: &LayerTargets,
        gateway: &mut G,
    ) {
        for side in SIDES {
            let target = targets.aggressive.price(side);
            self.place_if_open(LayerKind::Aggressive, side, target, gateway);
        }

        for side in SIDES {
            for kind in RESTING_LAYERS {
                self.cancel_if_stale(kind, side, targets.get(kind).price(side), gateway);
            }
        }

        for side in SIDES {
            for kind in RESTING_LAYERS {
                self.place_if_open(kind, side, targets.get(kind).price(side), gateway);
            }
        }
    }

    /// Cancel a resting quote whose price no longer matches a non-zero target.
    ///
    /// The slot is cleared immediately; the identifier stays in its side set
    /// until the venue reports it terminated, so late fills still hedge.
    fn cancel_if_stale<G: OrderGateway + ?Sized>(
        &mut self,
        kind: LayerKind,
        side: Side,
        target: Price,
        gateway: &mut G,
    ) {
        debug_assert!(kind.replaces_stale());
        let slot = self.layers[kind.index()].slot_mut(side);
        let Some(order_id) = slot.id() else {
            return;
        };
        if target.is_zero() || slot.price() == target {
            return;
        }
        slot.clear();
        debug!(
            layer = %kind,
            side = %side,
            order_id = order_id.raw(),
            target = %target,
            "Cancelling stale quote"
        );
        gateway.cancel_order(order_id);
    }

    fn place_if_open<G: OrderGateway + ?Sized>(
        &mut self,
        kind: LayerKind,
        side: Side,
        target: Price,
        gateway: &mut G,
    ) {
        let layer = &self.layers[kind.index()];
        if !layer.slot(side).is_empty() || target.is_zero() {
            return;
        }
        if !self.limit.allows(side, layer.position()) {
            debug!(
                layer = %kind,
                side = %side,
                position = layer.position(),
                limit = self.limit.limit(),
                "Position limit blocks quote"
            );
            return;
        }

        let order_id = self.ids.next_id();
        let volume = self.volumes[kind.index()];
        let lifespan = kind.lifespan();
        self.layers[kind.index()]
            .slot_mut(side)
            .occupy(order_id, target);
        match side {
            Side::Buy => self.bids.insert(order_id),
            Side::Sell => self.asks.insert(order_id),
        };
        debug!(
            layer = %kind,
            side = %side,
            order_id = order_id.raw(),
            price = %target,
            volume = %volume,
            "Inserting quote"
        );
        gateway.insert_order(order_id, side, target, volume, lifespan);
    }

    /// Shift every layer's position by a fill.
    pub fn apply_fill_all(&mut self, side: Side, volume: Volume) {
        for layer in &mut self.layers {
            layer.apply_fill(side, volume);
        }
    }

    /// Handle an order-status notification.
    ///
    /// Only a zero remaining volume terminates the order. Returns whether it
    /// did.
    pub fn on_order_status(&mut self, order_id: OrderId, remaining: Volume) -> bool {
        if !remaining.is_zero() {
            return false;
        }
        for layer in &mut self.layers {
            if layer.kind() == LayerKind::Aggressive && !self.rearm_aggressive {
                continue;
            }
            for side in SIDES {
                let slot = layer.slot_mut(side);
                if slot.holds(order_id) {
                    slot.clear();
                }
            }
        }
        self.bids.remove(&order_id);
        self.asks.remove(&order_id);
        true
    }

    /// Handle a venue error for an order.
    ///
    /// A tracked identifier is terminated as if a zero-remaining status had
    /// arrived. Returns whether the identifier was tracked.
    pub fn on_error(&mut self, order_id: OrderId) -> bool {
        if order_id.is_unset() || self.side_of(order_id).is_none() {
            return false;
        }
        info!(order_id = order_id.raw(), "Terminating order after venue error");
        self.on_order_status(order_id, Volume::ZERO)
    }
}
