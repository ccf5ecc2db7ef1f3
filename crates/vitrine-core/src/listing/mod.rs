//! Advertisement listing module.
//!
//! Contains the advertisement record, categories and write-back patches.

mod advertisement;
mod category;

pub use advertisement::{Advertisement, TierPatch};
pub use category::{partition_by_category, Category};
