//! Core domain types for the future/ETF market maker.
//!
//! This crate provides fundamental types used throughout the trading system:
//! - `Price`, `Volume`: integer-cent prices and lot volumes
//! - `OrderId`, `OrderIdSequence`: client order identifiers
//! - `Side`, `Lifespan`: order enums
//! - `Instrument`, `PriceBounds`: the two traded instruments and venue limits
//! - `BookSnapshot`: one depth snapshot for an instrument
//! - `VenueEvent`, `OrderCommand`: inbound notifications and outbound requests

pub mod book;
pub mod error;
pub mod event;
pub mod instrument;
pub mod order;
pub mod price;

pub use book::{BookSnapshot, TOP_LEVEL_COUNT};
pub use error::{CoreError, Result};
pub use event::{OrderCommand, VenueEvent};
pub use instrument::{Instrument, PriceBounds, MAXIMUM_ASK, MINIMUM_BID};
pub use order::{Lifespan, OrderId, OrderIdSequence, Side};
pub use price::{Price, Volume};
