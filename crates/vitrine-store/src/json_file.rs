//! Store backed by a JSON array file.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use vitrine_core::listing::{Advertisement, TierPatch};
use vitrine_core::AdId;

use crate::store::ensure_unique_ids;
use crate::{AdStore, PatchOutcome, StoreError, StoreResult};

/// Advertisements kept as one JSON array on disk.
///
/// Reads always see the file as it is now. Writers are serialized and the
/// file is replaced atomically (temp file, then rename), so a crash mid-write
/// leaves the previous contents in place.
///
/// Write-back only touches the records it patches: their tier fields are
/// merged into the stored object, every other record is written out exactly
/// as it was read.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// The file's records, as stored text and as typed values, index-aligned.
struct Snapshot {
    raw: Vec<Box<RawValue>>,
    records: Vec<Advertisement>,
}

impl JsonFileStore {
    /// Open an existing data file and check it parses.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        if !tokio::fs::try_exists(&store.path).await? {
            return Err(StoreError::NotFound(store.path.display().to_string()));
        }
        store.read().await?;
        Ok(store)
    }

    /// Create (or replace) a data file with the given records.
    pub async fn create(path: impl AsRef<Path>, records: &[Advertisement]) -> StoreResult<Self> {
        ensure_unique_ids(records)?;
        let store = Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        store.replace(serde_json::to_vec_pretty(records)?).await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StoreResult<Snapshot> {
        let bytes = tokio::fs::read(&self.path).await?;
        let raw: Vec<Box<RawValue>> = serde_json::from_slice(&bytes)?;
        let records = raw
            .iter()
            .map(|record| serde_json::from_str(record.get()))
            .collect::<Result<Vec<Advertisement>, _>>()?;
        ensure_unique_ids(&records)?;
        Ok(Snapshot { raw, records })
    }

    async fn replace(&self, bytes: Vec<u8>) -> StoreResult<()> {
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl AdStore for JsonFileStore {
    async fn list_all(&self) -> StoreResult<Vec<Advertisement>> {
        Ok(self.read().await?.records)
    }

    async fn apply_patches(&self, patches: &[TierPatch]) -> StoreResult<PatchOutcome> {
        let _guard = self.write_lock.lock().await;
        let Snapshot { mut raw, records } = self.read().await?;

        let index: HashMap<&AdId, usize> = records
            .iter()
            .enumerate()
            .map(|(i, a)| (&a.id, i))
            .collect();

        let mut patched: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
        let mut outcome = PatchOutcome::default();
        for patch in patches {
            let Some(&i) = index.get(&patch.id) else {
                outcome.missing.push(patch.id.clone());
                continue;
            };
            let object = match patched.entry(i) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(serde_json::from_str(raw[i].get())?),
            };
            merge_patch(object, patch)?;
            outcome.applied += 1;
        }

        if patched.is_empty() {
            return Ok(outcome);
        }

        for (i, object) in patched {
            raw[i] = serde_json::value::to_raw_value(&object)?;
        }
        self.replace(serde_json::to_vec_pretty(&raw)?).await?;
        Ok(outcome)
    }
}

/// Overwrite the patch's tier fields on a stored object, leaving every other
/// key (legacy names included) as it was.
fn merge_patch(object: &mut Map<String, Value>, patch: &TierPatch) -> serde_json::Result<()> {
    if let Value::Object(fields) = serde_json::to_value(patch)? {
        for (key, value) in fields {
            if key != "id" {
                object.insert(key, value);
            }
        }
    }
    Ok(())
}
