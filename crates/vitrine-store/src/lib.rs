//! Advertisement stores for Vitrine.
//!
//! The tier engine never touches storage. Batch jobs read each category
//! through an [`AdStore`], run the engine, and write the resulting
//! [`TierPatch`](vitrine_core::listing::TierPatch)es back through the same
//! store.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_store::prelude::*;
//! use vitrine_core::prelude::*;
//!
//! let store = JsonFileStore::open("anuncios.json").await?;
//! let ads = store.list_category(Category::Mulheres).await?;
//! let tiered = assign_tiers(&ads)?;
//! let patches: Vec<TierPatch> = tiered.iter().filter_map(|a| a.patch()).collect();
//! store.apply_patches(&patches).await?;
//! ```

mod error;
mod json_file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{order_oldest_first, AdStore, PatchOutcome};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{AdStore, JsonFileStore, MemoryStore, PatchOutcome, StoreError, StoreResult};
}
