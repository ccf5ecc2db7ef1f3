//! Tier assignment module.
//!
//! Contains tier levels, their configuration, price derivation, the
//! per-category engine and catalog-wide batch runs.

mod batch;
mod config;
mod engine;
mod level;
mod pricing;
mod summary;

pub use batch::{assign_catalog, CatalogRun, CategoryOutcome};
pub use config::{MissingPricePolicy, TierConfig, TierSpec, DEFAULT_MISSING_PRICE};
pub use engine::{assign_tiers, TierEngine};
pub use level::Tier;
pub use pricing::{DerivedPrices, HALF_HOUR_PERCENT, THREE_QUARTER_HOUR_PERCENT};
pub use summary::TierDistribution;
