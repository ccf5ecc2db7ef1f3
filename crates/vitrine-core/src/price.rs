//! Price type for derived advertisement rates.
//!
//! Prices are whole currency units. Fractions produced by multipliers are
//! truncated once, after the multiplication.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A price in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from whole units.
    pub fn new(units: i64) -> Self {
        Self(units)
    }

    /// A zero price.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Floor of `base * multiplier`.
    ///
    /// ```
    /// use vitrine_core::price::Price;
    /// assert_eq!(Price::scaled(301.0, 1.5).units(), 451);
    /// ```
    pub fn scaled(base: f64, multiplier: f64) -> Self {
        Self((base * multiplier).floor() as i64)
    }

    /// Floor of `base * multiplier`, or `None` when the product is not finite
    /// or does not fit in a price.
    pub fn checked_scaled(base: f64, multiplier: f64) -> Option<Self> {
        let product = (base * multiplier).floor();
        // i64::MAX rounds up to 2^63 as f64, which is already out of range.
        if !product.is_finite() || product >= i64::MAX as f64 || product < i64::MIN as f64 {
            return None;
        }
        Some(Self(product as i64))
    }

    /// Floor of `percent`% of this price.
    ///
    /// Computed in 128 bits, so it is exact for every price when
    /// `percent` is within 0..=100.
    pub fn percent(&self, percent: i64) -> Self {
        let scaled = (self.0 as i128 * percent as i128).div_euclid(100);
        Self(i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Get the amount in whole units.
    pub fn units(&self) -> i64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Price {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
