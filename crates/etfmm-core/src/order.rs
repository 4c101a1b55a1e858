//! Order-related types and identifiers.
//!
//! Provides order side, lifespan, and the client order ID type together
//! with the monotonic sequence every order and hedge draws from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
///
/// The venue's hedge interface calls these "bid" and "ask"; a hedge sell is
/// simply `Side::Sell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order validity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifespan {
    /// Rests on the book until cancelled, filled, or the session ends.
    #[default]
    GoodForDay,
    /// Matched on arrival, any remainder is cancelled by the venue.
    FillAndKill,
}

impl Lifespan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodForDay => "good_for_day",
            Self::FillAndKill => "fill_and_kill",
        }
    }
}

impl fmt::Display for Lifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client order identifier.
///
/// The venue echoes this back on fills, status and error notifications.
/// Zero is never issued and means "no order".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Sentinel the venue uses for errors not tied to an order.
    pub const UNSET: Self = Self(0);

    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Monotonic order identifier source shared by quotes and hedges.
///
/// CRITICAL: identifiers are never reused within a session. The venue
/// rejects duplicates and fills would be attributed to the wrong order.
#[derive(Debug, Clone)]
pub struct OrderIdSequence {
    next: u64,
}

impl OrderIdSequence {
    /// Start a sequence whose first identifier is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next identifier.
    pub fn next_id(&mut self) -> OrderId {
        let id = OrderId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers issued so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for OrderIdSequence {
    fn default() -> Self {
        Self::new()
    }
}
