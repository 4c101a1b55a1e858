//! Quote layers and their target prices.
//!
//! Three layers quote the ETF at once:
//! - Standard: level `2 + depth_shift` of the future book, skewed by its inventory
//! - Skewed: level 2 plus the spread skew, skewed by its inventory
//! - Aggressive: one offset inside the skewed targets, fill-and-kill
//!
//! Each layer owns one bid slot and one ask slot. A slot holds at most one
//! live order, which is what keeps each layer to a single bid and ask.

use etfmm_core::{BookSnapshot, CoreError, Lifespan, OrderId, Price, Side, Volume};

use crate::config::QuoterConfig;
use crate::error::QuoterResult;
use crate::inventory::inventory_adjustment;
use crate::signal::Signals;

/// Depth level the layers quote around.
pub const QUOTE_LEVEL: i64 = 2;

/// Identity of a quote layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Standard,
    Skewed,
    Aggressive,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [Self::Standard, Self::Skewed, Self::Aggressive];

    pub fn index(&self) -> usize {
        match self {
            Self::Standard => 0,
            Self::Skewed => 1,
            Self::Aggressive => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Skewed => "skewed",
            Self::Aggressive => "aggressive",
        }
    }

    pub fn lifespan(&self) -> Lifespan {
        match self {
            Self::Standard | Self::Skewed => Lifespan::GoodForDay,
            Self::Aggressive => Lifespan::FillAndKill,
        }
    }

    pub fn volume(&self, config: &QuoterConfig) -> Volume {
        match self {
            Self::Standard | Self::Skewed => config.lot(),
            Self::Aggressive => Volume::new(config.aggressive_volume),
        }
    }

    /// Whether resting orders are cancelled when the target moves.
    ///
    /// Fill-and-kill orders never rest, so the aggressive layer only inserts.
    pub fn replaces_stale(&self) -> bool {
        !matches!(self, Self::Aggressive)
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target prices for one layer. Zero means "no target".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotePair {
    pub bid: Price,
    pub ask: Price,
}

impl QuotePair {
    pub fn new(bid: Price, ask: Price) -> Self {
        Self { bid, ask }
    }

    pub fn price(&self, side: Side) -> Price {
        match side {
            Side::Buy => self.bid,
            Side::Sell => self.ask,
        }
    }
}

/// Targets for all three layers from one future update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerTargets {
    pub standard: QuotePair,
    pub skewed: QuotePair,
    pub aggressive: QuotePair,
}

impl LayerTargets {
    pub fn get(&self, kind: LayerKind) -> QuotePair {
        match kind {
            LayerKind::Standard => self.standard,
            LayerKind::Skewed => self.skewed,
            LayerKind::Aggressive => self.aggressive,
        }
    }
}

/// Compute every layer's targets.
///
/// `standard_position` and `skewed_position` feed each layer's inventory
/// skew. The aggressive layer inherits the skewed layer's skew through its
/// targets.
pub fn compute_targets(
    snapshot: &BookSnapshot,
    signals: Signals,
    standard_position: i64,
    skewed_position: i64,
    config: &QuoterConfig,
) -> QuoterResult<LayerTargets> {
    let tick = config.tick();

    let standard_adj = inventory_adjustment(standard_position, config.lot_size, tick);
    let level = depth_level(QUOTE_LEVEL + signals.depth_shift)?;
    let standard = QuotePair::new(
        snapshot.bid_at(level)? + standard_adj,
        snapshot.ask_at(level)? + standard_adj,
    );

    let skewed_adj = inventory_adjustment(skewed_position, config.lot_size, tick);
    let centre = depth_level(QUOTE_LEVEL)?;
    let skewed = QuotePair::new(
        snapshot.bid_at(centre)? + signals.spread_skew + skewed_adj,
        snapshot.ask_at(centre)? + signals.spread_skew + skewed_adj,
    );

    let offset = Price::new(config.aggressive_offset);
    let aggressive = QuotePair::new(skewed.bid + offset, skewed.ask - offset);

    Ok(LayerTargets {
        standard,
        skewed,
        aggressive,
    })
}

fn depth_level(level: i64) -> QuoterResult<usize> {
    usize::try_from(level).map_err(|_| CoreError::LevelOutOfRange(0).into())
}

/// One side of a layer: the live order (if any) and its quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderSlot {
    id: Option<OrderId>,
    price: Price,
}

impl OrderSlot {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Price of the most recent order placed from this slot.
    pub fn price(&self) -> Price {
        self.price
    }

    pub fn holds(&self, order_id: OrderId) -> bool {
        self.id == Some(order_id)
    }

    pub fn occupy(&mut self, order_id: OrderId, price: Price) {
        self.id = Some(order_id);
        self.price = price;
    }

    /// Forget the live order. The last price is kept.
    pub fn clear(&mut self) -> Option<OrderId> {
        self.id.take()
    }
}

/// A quote layer's state.
#[derive(Debug, Clone)]
pub struct QuoteLayer {
    kind: LayerKind,
    bid: OrderSlot,
    ask: OrderSlot,
    position: i64,
}

impl QuoteLayer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            bid: OrderSlot::default(),
            ask: OrderSlot::default(),
            position: 0,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Signed position in lots (positive = long).
    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn slot(&self, side: Side) -> &OrderSlot {
        match side {
            Side::Buy => &self.bid,
            Side::Sell => &self.ask,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut OrderSlot {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }

    /// Shift the position by a filled volume on `side`.
    pub fn apply_fill(&mut self, side: Side, volume: Volume) {
        self.position += side.sign() * volume.signed();
    }
}
