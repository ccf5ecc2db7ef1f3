//! Catalog-wide runs.
//!
//! A bad record only costs its own category: the category is skipped and
//! reported, every other category is still tiered.

use crate::error::InvalidInputError;
use crate::listing::{partition_by_category, Advertisement, Category, TierPatch};
use crate::tier::{TierDistribution, TierEngine};

/// Result of tiering one category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    /// Every record was tiered.
    Tiered {
        category: Category,
        ads: Vec<Advertisement>,
        distribution: TierDistribution,
    },
    /// Validation failed; nothing in the category was tiered.
    Skipped {
        category: Category,
        input_len: usize,
        error: InvalidInputError,
    },
}

impl CategoryOutcome {
    /// Run the engine over one category's ordered list.
    pub fn run(engine: &TierEngine, category: Category, ads: &[Advertisement]) -> Self {
        match engine.assign_tiers(ads) {
            Ok(tiered) => CategoryOutcome::Tiered {
                category,
                distribution: TierDistribution::from_ads(&tiered),
                ads: tiered,
            },
            Err(error) => CategoryOutcome::Skipped {
                category,
                input_len: ads.len(),
                error,
            },
        }
    }

    pub fn category(&self) -> Category {
        match self {
            CategoryOutcome::Tiered { category, .. } | CategoryOutcome::Skipped { category, .. } => {
                *category
            }
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CategoryOutcome::Skipped { .. })
    }

    /// Write-back patches; empty for a skipped category.
    pub fn patches(&self) -> Vec<TierPatch> {
        match self {
            CategoryOutcome::Tiered { ads, .. } => ads.iter().filter_map(|a| a.patch()).collect(),
            CategoryOutcome::Skipped { .. } => Vec::new(),
        }
    }
}

/// Outcomes of a run over several categories, in category order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRun {
    pub outcomes: Vec<CategoryOutcome>,
}

impl CatalogRun {
    /// Categories that were tiered.
    pub fn tiered(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_skipped())
    }

    /// Categories that were skipped.
    pub fn skipped(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    /// All write-back patches of the run.
    pub fn patches(&self) -> Vec<TierPatch> {
        self.outcomes.iter().flat_map(|o| o.patches()).collect()
    }

    /// Combined distribution of the tiered categories.
    pub fn distribution(&self) -> TierDistribution {
        let mut total = TierDistribution::default();
        for outcome in &self.outcomes {
            if let CategoryOutcome::Tiered { distribution, .. } = outcome {
                total += *distribution;
            }
        }
        total
    }

    /// Tiered records of every successful category.
    pub fn into_ads(self) -> Vec<Advertisement> {
        self.outcomes
            .into_iter()
            .flat_map(|o| match o {
                CategoryOutcome::Tiered { ads, .. } => ads,
                CategoryOutcome::Skipped { .. } => Vec::new(),
            })
            .collect()
    }
}

/// Partition a catalog by category and tier each category independently.
///
/// `ads` must already be in priority order; relative order is kept within
/// each category.
pub fn assign_catalog(
    engine: &TierEngine,
    ads: impl IntoIterator<Item = Advertisement>,
) -> CatalogRun {
    let outcomes = partition_by_category(ads)
        .into_iter()
        .map(|(category, group)| CategoryOutcome::run(engine, category, &group))
        .collect();

    CatalogRun { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;

    fn category_ads(category: Category, prefix: &str, n: usize) -> Vec<Advertisement> {
        (0..n)
            .map(|i| Advertisement::new(format!("{prefix}-{i}"), category, Some(200.0)))
            .collect()
    }

    #[test]
    fn test_categories_use_independent_quotas() {
        let mut ads = category_ads(Category::Mulheres, "m", 40);
        ads.extend(category_ads(Category::Trans, "t", 40));

        let run = assign_catalog(&TierEngine::default(), ads);
        assert_eq!(run.outcomes.len(), 2);
        assert_eq!(run.skipped().count(), 0);

        for outcome in run.tiered() {
            if let CategoryOutcome::Tiered { distribution, .. } = outcome {
                assert_eq!(distribution.n1, 29);
                assert_eq!(distribution.n3, 11);
                assert_eq!(distribution.n7, 0);
            }
        }
        assert_eq!(run.distribution().n1, 58);
        assert_eq!(run.patches().len(), 80);
    }

    #[test]
    fn test_bad_category_skipped_others_run() {
        let mut ads = category_ads(Category::Homens, "h", 3);
        ads[1].base_price = Some(-1.0);
        ads.extend(category_ads(Category::Massagistas, "s", 2));

        let run = assign_catalog(&TierEngine::default(), ads);
        let skipped: Vec<Category> = run.skipped().map(|o| o.category()).collect();
        assert_eq!(skipped, vec![Category::Homens]);

        let tiered = run.clone().into_ads();
        assert_eq!(tiered.len(), 2);
        assert!(tiered.iter().all(|a| a.tier == Some(Tier::N1)));
        assert_eq!(run.patches().len(), 2);

        match &run.outcomes[1] {
            CategoryOutcome::Skipped { input_len, error, .. } => {
                assert_eq!(*input_len, 3);
                assert_eq!(error.ad_id().as_str(), "h-1");
            }
            other => panic!("expected skipped homens, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let run = assign_catalog(&TierEngine::default(), Vec::new());
        assert!(run.outcomes.is_empty());
        assert_eq!(run.distribution().total(), 0);
    }
}
