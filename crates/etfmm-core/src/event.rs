//! Inbound venue notifications and outbound order requests.
//!
//! These are the only shapes that cross the boundary between the quoting
//! core and the host connector:
//! - `VenueEvent`: everything the venue tells us, one at a time, in order
//! - `OrderCommand`: everything we ask of the venue, fire-and-forget

use serde::{Deserialize, Serialize};

use crate::book::BookSnapshot;
use crate::order::{Lifespan, OrderId, Side};
use crate::price::{Price, Volume};

/// Inbound notification from the venue connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VenueEvent {
    /// Depth snapshot for either instrument.
    OrderBookUpdate(BookSnapshot),
    /// Recent trades, same shape as a book update.
    TradeTicks(BookSnapshot),
    /// One of our quotes traded.
    OrderFilled {
        order_id: OrderId,
        price: Price,
        volume: Volume,
    },
    /// Order state change. `remaining_volume == 0` is terminal.
    OrderStatus {
        order_id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    },
    /// The venue rejected or failed an order (or sent a general error with id 0).
    Error { order_id: OrderId, message: String },
    /// A hedge order traded.
    HedgeFilled {
        order_id: OrderId,
        average_price: Price,
        volume: Volume,
    },
}

impl VenueEvent {
    /// Short name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderBookUpdate(_) => "order_book_update",
            Self::TradeTicks(_) => "trade_ticks",
            Self::OrderFilled { .. } => "order_filled",
            Self::OrderStatus { .. } => "order_status",
            Self::Error { .. } => "error",
            Self::HedgeFilled { .. } => "hedge_filled",
        }
    }
}

/// Outbound request to the venue connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderCommand {
    /// Insert a quote on the ETF.
    Insert {
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    },
    /// Cancel a resting quote.
    Cancel { order_id: OrderId },
    /// Aggressive offsetting order on the future.
    Hedge {
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
}

impl OrderCommand {
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Insert { order_id, .. }
            | Self::Cancel { order_id }
            | Self::Hedge { order_id, .. } => *order_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Cancel { .. } => "cancel",
            Self::Hedge { .. } => "hedge",
        }
    }
}
