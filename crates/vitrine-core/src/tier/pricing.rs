//! Derived price fields.

use serde::{Deserialize, Serialize};

use crate::price::Price;

/// Share of the hourly rate charged for 30 minutes.
pub const HALF_HOUR_PERCENT: i64 = 60;

/// Share of the hourly rate charged for 45 minutes.
pub const THREE_QUARTER_HOUR_PERCENT: i64 = 80;

/// Rates derived from a base price and a tier multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DerivedPrices {
    #[serde(rename = "pricePerHour")]
    pub price_per_hour: Price,
    #[serde(rename = "price30Min")]
    pub price_30_min: Price,
    #[serde(rename = "price45Min")]
    pub price_45_min: Price,
    #[serde(rename = "price1Hour")]
    pub price_1_hour: Price,
}

impl DerivedPrices {
    /// Derive all rates.
    ///
    /// The hourly rate is `floor(base * multiplier)`; the shorter sessions
    /// are floored percentages of that rate.
    pub fn derive(base_price: f64, multiplier: f64) -> Self {
        Self::from_hourly(Price::scaled(base_price, multiplier))
    }

    /// Like [`derive`](Self::derive), but `None` when the hourly rate does
    /// not fit in a [`Price`].
    pub fn checked_derive(base_price: f64, multiplier: f64) -> Option<Self> {
        let hourly = Price::checked_scaled(base_price, multiplier)?;
        Some(Self::from_hourly(hourly))
    }

    fn from_hourly(hourly: Price) -> Self {
        Self {
            price_per_hour: hourly,
            price_30_min: hourly.percent(HALF_HOUR_PERCENT),
            price_45_min: hourly.percent(THREE_QUARTER_HOUR_PERCENT),
            price_1_hour: hourly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_from_300() {
        let prices = DerivedPrices::derive(300.0, 2.0);
        assert_eq!(prices.price_per_hour.units(), 600);
        assert_eq!(prices.price_30_min.units(), 360);
        assert_eq!(prices.price_45_min.units(), 480);
        assert_eq!(prices.price_1_hour.units(), 600);
    }

    #[test]
    fn test_featured_truncation() {
        // 255 * 1.5 = 382.5 -> 382; 382 * 0.6 = 229.2 -> 229; 382 * 0.8 = 305.6 -> 305
        let prices = DerivedPrices::derive(255.0, 1.5);
        assert_eq!(prices.price_per_hour.units(), 382);
        assert_eq!(prices.price_30_min.units(), 229);
        assert_eq!(prices.price_45_min.units(), 305);
    }

    #[test]
    fn test_truncate_product_not_factors() {
        // Truncating the base first would give floor(150) * 1.5 = 225.
        let prices = DerivedPrices::derive(150.9, 1.5);
        assert_eq!(prices.price_per_hour.units(), 226);
    }

    #[test]
    fn test_checked_derive_large_base() {
        let prices = DerivedPrices::checked_derive(1e18, 2.0).unwrap();
        assert_eq!(prices.price_per_hour.units(), 2_000_000_000_000_000_000);
        assert_eq!(prices.price_30_min.units(), 1_200_000_000_000_000_000);
        assert_eq!(prices.price_45_min.units(), 1_600_000_000_000_000_000);
        assert!(DerivedPrices::checked_derive(5e18, 2.0).is_none());
    }

    #[test]
    fn test_zero_base() {
        let prices = DerivedPrices::derive(0.0, 2.0);
        assert!(prices.price_per_hour.is_zero());
        assert!(prices.price_30_min.is_zero());
    }
}
