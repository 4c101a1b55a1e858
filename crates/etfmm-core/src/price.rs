//! Integer price and volume types.
//!
//! Prices are whole cents. Keeping them as `i64` makes tick arithmetic and
//! floor division exact, and lets a `Price` double as a signed offset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Price in integer cents.
///
/// Also used for signed price offsets (inventory skew, spread skew).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(pub i64);

impl Price {
    /// The "unset" price. A target of zero is never quoted.
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[inline]
    pub fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Round down to a multiple of `tick_size` (toward negative infinity).
    #[inline]
    pub fn floor_to_tick(&self, tick_size: Price) -> Self {
        if tick_size.is_zero() {
            return *self;
        }
        Self(self.0.div_euclid(tick_size.0) * tick_size.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Price {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Order or fill volume in lots.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(pub u32);

impl Volume {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(lots: u32) -> Self {
        Self(lots)
    }

    #[inline]
    pub fn lots(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Signed lots, for position arithmetic.
    #[inline]
    pub fn signed(&self) -> i64 {
        i64::from(self.0)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
