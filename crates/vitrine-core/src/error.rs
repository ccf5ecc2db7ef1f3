//! Tiering error types.

use thiserror::Error;

use crate::ids::AdId;
use crate::listing::Category;

/// Input rejected by the tier engine.
///
/// Raised before any output is produced; a call either tiers the whole list
/// or fails with one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    /// Base price below zero.
    #[error("Invalid input: advertisement {ad_id} has negative base price {price}")]
    NegativePrice { ad_id: AdId, price: f64 },

    /// Base price is NaN or infinite.
    #[error("Invalid input: advertisement {ad_id} has non-finite base price")]
    NonFinitePrice { ad_id: AdId },

    /// More than one category in a single call.
    #[error("Invalid input: advertisement {ad_id} is in {found}, expected {expected}")]
    MixedCategories {
        ad_id: AdId,
        expected: Category,
        found: Category,
    },

    /// Base price absent under the reject policy.
    #[error("Invalid input: advertisement {ad_id} has no base price")]
    MissingPrice { ad_id: AdId },

    /// Base price times the tier multiplier does not fit in a price.
    #[error("Invalid input: advertisement {ad_id} base price {price} x {multiplier} is out of range")]
    PriceOutOfRange {
        ad_id: AdId,
        price: f64,
        multiplier: f64,
    },
}

impl InvalidInputError {
    /// The advertisement that triggered the error.
    pub fn ad_id(&self) -> &AdId {
        match self {
            InvalidInputError::NegativePrice { ad_id, .. }
            | InvalidInputError::NonFinitePrice { ad_id }
            | InvalidInputError::MixedCategories { ad_id, .. }
            | InvalidInputError::MissingPrice { ad_id }
            | InvalidInputError::PriceOutOfRange { ad_id, .. } => ad_id,
        }
    }
}

/// Errors in a tier configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Multiplier is zero, negative or non-finite.
    #[error("Invalid multiplier for {tier}: {multiplier}")]
    InvalidMultiplier { tier: String, multiplier: f64 },

    /// Empty display label.
    #[error("Empty label for {0}")]
    EmptyLabel(String),

    /// Default price for missing values is negative.
    #[error("Invalid default price: {0}")]
    InvalidDefaultPrice(i64),
}
