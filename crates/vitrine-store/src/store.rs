//! Store interface.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use vitrine_core::listing::{Advertisement, Category, TierPatch};
use vitrine_core::AdId;

use crate::{StoreError, StoreResult};

/// Result of writing patches back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Number of patches written.
    pub applied: usize,
    /// Patch ids with no matching record. These are skipped, not created.
    pub missing: Vec<AdId>,
}

/// Source and sink of advertisement records.
///
/// Implementations own their concurrency. Patches are upserts keyed by id;
/// when the same id is patched twice the last write wins.
#[async_trait]
pub trait AdStore: Send + Sync {
    /// Every record, in stored order.
    async fn list_all(&self) -> StoreResult<Vec<Advertisement>>;

    /// One category, oldest first (see [`order_oldest_first`]).
    async fn list_category(&self, category: Category) -> StoreResult<Vec<Advertisement>> {
        let mut ads: Vec<Advertisement> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|a| a.category == category)
            .collect();
        order_oldest_first(&mut ads);
        Ok(ads)
    }

    /// Categories that have at least one record, in catalog order.
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let ads = self.list_all().await?;
        Ok(Category::ALL
            .into_iter()
            .filter(|c| ads.iter().any(|a| a.category == *c))
            .collect())
    }

    /// Write tier fields back to existing records.
    async fn apply_patches(&self, patches: &[TierPatch]) -> StoreResult<PatchOutcome>;
}

/// Sort by `createdAt` ascending; records without a timestamp go last.
///
/// The sort is stable, so ties keep their stored order.
pub fn order_oldest_first(ads: &mut [Advertisement]) {
    ads.sort_by_key(|a| (a.created_at.is_none(), a.created_at));
}

/// Apply patches in order to an in-memory record set.
pub(crate) fn apply_to(records: &mut [Advertisement], patches: &[TierPatch]) -> PatchOutcome {
    let index: HashMap<AdId, usize> = records
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.clone(), i))
        .collect();

    let mut outcome = PatchOutcome::default();
    for patch in patches {
        match index.get(&patch.id) {
            Some(&i) => {
                records[i].apply_patch(patch);
                outcome.applied += 1;
            }
            None => outcome.missing.push(patch.id.clone()),
        }
    }
    outcome
}

/// Reject record sets where an id appears twice.
pub(crate) fn ensure_unique_ids(records: &[Advertisement]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for ad in records {
        if !seen.insert(&ad.id) {
            return Err(StoreError::DuplicateId(ad.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::tier::{DerivedPrices, Tier};

    fn patch(id: &str, tier: Tier) -> TierPatch {
        TierPatch {
            id: id.into(),
            tier,
            tier_label: "x".to_string(),
            is_featured: tier.is_featured(),
            is_premium: tier.is_premium(),
            prices: DerivedPrices::derive(100.0, 1.0),
        }
    }

    #[test]
    fn test_apply_to_last_write_wins() {
        let mut records = vec![Advertisement::new("a", Category::Trans, Some(100.0))];
        let outcome = apply_to(&mut records, &[patch("a", Tier::N1), patch("a", Tier::N7)]);
        assert_eq!(outcome.applied, 2);
        assert_eq!(records[0].tier, Some(Tier::N7));
    }

    #[test]
    fn test_apply_to_reports_missing() {
        let mut records = vec![Advertisement::new("a", Category::Trans, Some(100.0))];
        let outcome = apply_to(&mut records, &[patch("zzz", Tier::N1)]);
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.missing, vec![AdId::new("zzz")]);
        assert!(!records[0].is_tiered());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            Advertisement::new("a", Category::Trans, None),
            Advertisement::new("a", Category::Homens, None),
        ];
        assert!(matches!(
            ensure_unique_ids(&records),
            Err(StoreError::DuplicateId(id)) if id.as_str() == "a"
        ));
    }
}
