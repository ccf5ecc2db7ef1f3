//! Advertisement tiering for the Vitrine classifieds catalog.
//!
//! This crate provides the pure domain logic used by the batch jobs:
//!
//! - **Listing**: Advertisements, categories, write-back patches
//! - **Tier**: Tier levels, quota configuration, price derivation,
//!   the assignment engine and catalog-wide batch runs
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::prelude::*;
//!
//! let ads: Vec<Advertisement> = (0..40)
//!     .map(|i| Advertisement::new(format!("ad-{i}"), Category::Mulheres, Some(300.0)))
//!     .collect();
//!
//! let tiered = assign_tiers(&ads).unwrap();
//! assert_eq!(tiered[0].tier, Some(Tier::N1));
//! assert_eq!(tiered[0].prices().unwrap().price_30_min.units(), 360);
//! assert_eq!(tiered[39].tier, Some(Tier::N3));
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod listing;
pub mod tier;

pub use error::{ConfigError, InvalidInputError};
pub use ids::AdId;
pub use price::Price;
pub use tier::assign_tiers;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, InvalidInputError};
    pub use crate::ids::AdId;
    pub use crate::price::Price;

    // Listing
    pub use crate::listing::{partition_by_category, Advertisement, Category, TierPatch};

    // Tier
    pub use crate::tier::{
        assign_catalog, assign_tiers, CatalogRun, CategoryOutcome, DerivedPrices,
        MissingPricePolicy, Tier, TierConfig, TierDistribution, TierEngine, TierSpec,
    };
}
