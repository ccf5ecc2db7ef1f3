//! Per-category tier assignment.

use crate::error::InvalidInputError;
use crate::listing::{Advertisement, TierPatch};
use crate::tier::{DerivedPrices, MissingPricePolicy, Tier, TierConfig};

/// Assigns tiers and derived prices to one category's advertisements.
///
/// Tiers follow list position only: the first `n1.quota` records become N1,
/// the next `n3.quota` become N3, the rest N7. The engine never sorts, so the
/// caller decides priority by ordering the list. It holds no state between
/// calls and never mutates its input.
#[derive(Debug, Clone, Default)]
pub struct TierEngine {
    config: TierConfig,
    missing_price: MissingPricePolicy,
}

impl TierEngine {
    /// Create an engine with the given tier configuration.
    pub fn new(config: TierConfig) -> Self {
        Self {
            config,
            missing_price: MissingPricePolicy::default(),
        }
    }

    /// Set the policy for records without a base price.
    pub fn with_missing_price(mut self, policy: MissingPricePolicy) -> Self {
        self.missing_price = policy;
        self
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    pub fn missing_price(&self) -> MissingPricePolicy {
        self.missing_price
    }

    /// Tier of the item at `position` in a list of `len` items.
    pub fn tier_at(&self, position: usize, len: usize) -> Tier {
        let n1 = self.config.n1.quota.unwrap_or(usize::MAX).min(len);
        let n3 = self.config.n3.quota.unwrap_or(usize::MAX).min(len - n1);

        if position < n1 {
            Tier::N1
        } else if position < n1 + n3 {
            Tier::N3
        } else {
            Tier::N7
        }
    }

    /// Assign tiers to an ordered, single-category list.
    ///
    /// Returns fresh copies with `tier`, `tierLabel`, the featured/premium
    /// flags and all derived prices set, in input order. The whole list is
    /// validated before anything is computed.
    ///
    /// Records dropped by [`MissingPricePolicy::Skip`] are absent from the
    /// output and take no quota slot.
    pub fn assign_tiers(
        &self,
        ads: &[Advertisement],
    ) -> Result<Vec<Advertisement>, InvalidInputError> {
        let priced = self.validate(ads)?;
        let len = priced.len();

        let mut planned = Vec::with_capacity(len);
        for (position, (ad, base_price)) in priced.into_iter().enumerate() {
            let tier = self.tier_at(position, len);
            let multiplier = self.config.spec(tier).multiplier;
            let prices = DerivedPrices::checked_derive(base_price, multiplier).ok_or_else(|| {
                InvalidInputError::PriceOutOfRange {
                    ad_id: ad.id.clone(),
                    price: base_price,
                    multiplier,
                }
            })?;
            planned.push((ad, tier, prices));
        }

        let tiered = planned
            .into_iter()
            .map(|(ad, tier, prices)| {
                let patch = TierPatch {
                    id: ad.id.clone(),
                    tier,
                    tier_label: self.config.spec(tier).label.clone(),
                    is_featured: tier.is_featured(),
                    is_premium: tier.is_premium(),
                    prices,
                };

                let mut out = ad.clone();
                out.apply_patch(&patch);
                out
            })
            .collect();

        Ok(tiered)
    }

    /// Resolve every base price, or fail on the first bad record.
    fn validate<'a>(
        &self,
        ads: &'a [Advertisement],
    ) -> Result<Vec<(&'a Advertisement, f64)>, InvalidInputError> {
        let Some(first) = ads.first() else {
            return Ok(Vec::new());
        };
        let category = first.category;

        let mut priced = Vec::with_capacity(ads.len());
        for ad in ads {
            if ad.category != category {
                return Err(InvalidInputError::MixedCategories {
                    ad_id: ad.id.clone(),
                    expected: category,
                    found: ad.category,
                });
            }

            let base_price = match (ad.base_price, self.missing_price) {
                (Some(price), _) if !price.is_finite() => {
                    return Err(InvalidInputError::NonFinitePrice {
                        ad_id: ad.id.clone(),
                    });
                }
                (Some(price), _) if price < 0.0 => {
                    return Err(InvalidInputError::NegativePrice {
                        ad_id: ad.id.clone(),
                        price,
                    });
                }
                (Some(price), _) => price,
                (None, MissingPricePolicy::Default { price }) => price as f64,
                (None, MissingPricePolicy::Reject) => {
                    return Err(InvalidInputError::MissingPrice {
                        ad_id: ad.id.clone(),
                    });
                }
                (None, MissingPricePolicy::Skip) => continue,
            };

            priced.push((ad, base_price));
        }

        Ok(priced)
    }
}

/// Assign tiers with the default configuration (29 N1, 15 N3, rest N7).
pub fn assign_tiers(ads: &[Advertisement]) -> Result<Vec<Advertisement>, InvalidInputError> {
    TierEngine::default().assign_tiers(ads)
}
