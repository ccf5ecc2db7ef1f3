//! In-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use vitrine_core::listing::{Advertisement, TierPatch};

use crate::store::{apply_to, ensure_unique_ids};
use crate::{AdStore, PatchOutcome, StoreResult};

/// Records held in process memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Advertisement>>,
}

impl MemoryStore {
    /// Create a store holding the given records.
    pub fn new(records: Vec<Advertisement>) -> StoreResult<Self> {
        ensure_unique_ids(&records)?;
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AdStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Advertisement>> {
        Ok(self.records.read().await.clone())
    }

    async fn apply_patches(&self, patches: &[TierPatch]) -> StoreResult<PatchOutcome> {
        let mut records = self.records.write().await;
        Ok(apply_to(&mut records, patches))
    }
}
