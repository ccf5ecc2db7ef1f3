//! Listing categories.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listing::Advertisement;

/// Catalog section an advertisement is listed in.
///
/// Quotas are applied per category, so every run partitions by this first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mulheres,
    Massagistas,
    Trans,
    Homens,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 4] = [
        Category::Mulheres,
        Category::Massagistas,
        Category::Trans,
        Category::Homens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mulheres => "mulheres",
            Category::Massagistas => "massagistas",
            Category::Trans => "trans",
            Category::Homens => "homens",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mulheres" => Some(Category::Mulheres),
            "massagistas" => Some(Category::Massagistas),
            "trans" => Some(Category::Trans),
            "homens" => Some(Category::Homens),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Split advertisements into per-category lists.
///
/// Relative order inside each category is kept, so a caller that sorted the
/// whole catalog by priority gets each category in that same priority.
pub fn partition_by_category(
    ads: impl IntoIterator<Item = Advertisement>,
) -> BTreeMap<Category, Vec<Advertisement>> {
    let mut groups: BTreeMap<Category, Vec<Advertisement>> = BTreeMap::new();
    for ad in ads {
        groups.entry(ad.category).or_default().push(ad);
    }
    groups
}
