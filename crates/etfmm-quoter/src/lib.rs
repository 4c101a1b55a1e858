//! Future/ETF quoting engine.
//!
//! Turns each future order-book update into insert/cancel decisions across
//! three quote layers, and each fill into a hedge:
//! - `history`: recent best prices for both instruments
//! - `signal`: depth-shift and spread-skew signals
//! - `inventory`: position skew and position limits
//! - `layer`: target prices and per-layer order slots
//! - `lifecycle`: cancel/replace reconciliation and order tracking
//! - `hedge`: offsetting orders for fills
//! - `engine`: `MarketMaker`, which owns all of the above
//!
//! # Example
//!
//! ```
//! use etfmm_core::{BookSnapshot, Instrument, Price, VenueEvent, Volume};
//! use etfmm_quoter::{MarketMaker, QuoterConfig, RecordingGateway};
//!
//! let mut maker = MarketMaker::new(QuoterConfig::default()).unwrap();
//! let mut gateway = RecordingGateway::new();
//!
//! let book = BookSnapshot::new(
//!     Instrument::Future,
//!     1,
//!     (0..5).map(|i| Price::new(10_100 + 100 * i)).collect(),
//!     vec![Volume::new(50); 5],
//!     (0..5).map(|i| Price::new(10_000 - 100 * i)).collect(),
//!     vec![Volume::new(50); 5],
//! );
//! maker.handle(&VenueEvent::OrderBookUpdate(book), &mut gateway).unwrap();
//!
//! // One bid and one ask per layer
//! assert_eq!(gateway.inserts().count(), 6);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod hedge;
pub mod history;
pub mod inventory;
pub mod layer;
pub mod lifecycle;
pub mod signal;
pub mod stats;

pub use config::QuoterConfig;
pub use engine::MarketMaker;
pub use error::{QuoterError, QuoterResult};
pub use gateway::{OrderGateway, RecordingGateway};
pub use hedge::{HedgeController, HedgeOrder};
pub use history::{MarketHistory, PriceHistory};
pub use inventory::{inventory_adjustment, PositionLimit};
pub use layer::{LayerKind, LayerTargets, QuoteLayer, QuotePair};
pub use lifecycle::OrderLifecycle;
pub use signal::Signals;
pub use stats::SessionStats;
