//! Tier distribution counts.

use serde::{Deserialize, Serialize};

use crate::listing::Advertisement;
use crate::tier::{Tier, TierConfig};

/// How many advertisements sit in each tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub n1: usize,
    pub n3: usize,
    pub n7: usize,
    /// Records with no tier yet.
    pub unassigned: usize,
}

impl TierDistribution {
    /// Count the tiers currently on a set of advertisements.
    pub fn from_ads<'a>(ads: impl IntoIterator<Item = &'a Advertisement>) -> Self {
        let mut dist = Self::default();
        for ad in ads {
            match ad.tier {
                Some(Tier::N1) => dist.n1 += 1,
                Some(Tier::N3) => dist.n3 += 1,
                Some(Tier::N7) => dist.n7 += 1,
                None => dist.unassigned += 1,
            }
        }
        dist
    }

    /// Count for a single tier.
    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::N1 => self.n1,
            Tier::N3 => self.n3,
            Tier::N7 => self.n7,
        }
    }

    pub fn total(&self) -> usize {
        self.n1 + self.n3 + self.n7 + self.unassigned
    }

    /// Check if every record has a tier.
    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned == 0
    }

    /// Tiers holding more records than their quota allows.
    ///
    /// Only meaningful for one category. A fresh run never exceeds a quota;
    /// stored data can, when records left out of a run keep an older tier.
    pub fn over_quota(&self, config: &TierConfig) -> Vec<Tier> {
        [Tier::N1, Tier::N3]
            .into_iter()
            .filter(|&tier| {
                config
                    .spec(tier)
                    .quota
                    .map_or(false, |quota| self.count(tier) > quota)
            })
            .collect()
    }
}

impl std::ops::AddAssign for TierDistribution {
    fn add_assign(&mut self, other: Self) {
        self.n1 += other.n1;
        self.n3 += other.n3;
        self.n7 += other.n7;
        self.unassigned += other.unassigned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Category;

    #[test]
    fn test_from_ads() {
        let mut ads: Vec<Advertisement> = (0..4)
            .map(|i| Advertisement::new(format!("{i}"), Category::Homens, Some(1.0)))
            .collect();
        ads[0].tier = Some(Tier::N1);
        ads[1].tier = Some(Tier::N7);
        ads[2].tier = Some(Tier::N7);

        let dist = TierDistribution::from_ads(&ads);
        assert_eq!(dist.count(Tier::N1), 1);
        assert_eq!(dist.count(Tier::N3), 0);
        assert_eq!(dist.count(Tier::N7), 2);
        assert_eq!(dist.unassigned, 1);
        assert_eq!(dist.total(), 4);
        assert!(!dist.is_fully_assigned());
    }

    #[test]
    fn test_over_quota() {
        let config = TierConfig::default();
        let within = TierDistribution { n1: 29, n3: 15, n7: 400, unassigned: 3 };
        assert!(within.over_quota(&config).is_empty());

        let stale = TierDistribution { n1: 30, n3: 15, n7: 0, unassigned: 0 };
        assert_eq!(stale.over_quota(&config), vec![Tier::N1]);

        let mut unlimited = config.clone();
        unlimited.n1.quota = None;
        assert!(stale.over_quota(&unlimited).is_empty());
    }

    #[test]
    fn test_add_assign() {
        let mut total = TierDistribution { n1: 1, n3: 2, n7: 3, unassigned: 0 };
        total += TierDistribution { n1: 1, n3: 0, n7: 0, unassigned: 4 };
        assert_eq!(total, TierDistribution { n1: 2, n3: 2, n7: 3, unassigned: 4 });
    }
}
