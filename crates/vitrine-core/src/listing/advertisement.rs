//! Advertisement records and tier write-back patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::AdId;
use crate::listing::Category;
use crate::price::Price;
use crate::tier::{DerivedPrices, Tier};

/// An advertisement as seen by the tiering job.
///
/// Only the fields that tiering reads or writes are typed; anything else the
/// store keeps on the record travels untouched in `attributes`.
///
/// Deserialization accepts the legacy field names alongside the canonical
/// ones; serialization always writes the canonical names.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    /// Store-assigned identifier.
    pub id: AdId,
    /// Catalog category. Older records call this field `categoria`.
    pub category: Category,
    /// Advertiser's nominal price. Older records call this field `preco` and
    /// may hold it as a numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    /// Creation time, used by input providers to order a category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Assigned tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// Display name of the assigned tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_label: Option<String>,
    /// Shown in the featured strip (N1 and N3).
    #[serde(default)]
    pub is_featured: bool,
    /// Premium placement (N1 only).
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<Price>,
    #[serde(default, rename = "price30Min", skip_serializing_if = "Option::is_none")]
    pub price_30_min: Option<Price>,
    #[serde(default, rename = "price45Min", skip_serializing_if = "Option::is_none")]
    pub price_45_min: Option<Price>,
    #[serde(default, rename = "price1Hour", skip_serializing_if = "Option::is_none")]
    pub price_1_hour: Option<Price>,
    /// Fields the tiering job does not interpret.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Advertisement {
    /// Create an untiered advertisement.
    pub fn new(id: impl Into<AdId>, category: Category, base_price: Option<f64>) -> Self {
        Self {
            id: id.into(),
            category,
            base_price,
            created_at: None,
            tier: None,
            tier_label: None,
            is_featured: false,
            is_premium: false,
            price_per_hour: None,
            price_30_min: None,
            price_45_min: None,
            price_1_hour: None,
            attributes: serde_json::Map::new(),
        }
    }

    /// Set the creation time.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Check if a tier has been assigned.
    pub fn is_tiered(&self) -> bool {
        self.tier.is_some()
    }

    /// Derived prices, if all four are present.
    pub fn prices(&self) -> Option<DerivedPrices> {
        Some(DerivedPrices {
            price_per_hour: self.price_per_hour?,
            price_30_min: self.price_30_min?,
            price_45_min: self.price_45_min?,
            price_1_hour: self.price_1_hour?,
        })
    }

    /// The tier fields of this record, for write-back.
    pub fn patch(&self) -> Option<TierPatch> {
        Some(TierPatch {
            id: self.id.clone(),
            tier: self.tier?,
            tier_label: self.tier_label.clone()?,
            is_featured: self.is_featured,
            is_premium: self.is_premium,
            prices: self.prices()?,
        })
    }

    /// Overwrite the tier fields from a patch. The id is not checked.
    pub fn apply_patch(&mut self, patch: &TierPatch) {
        self.tier = Some(patch.tier);
        self.tier_label = Some(patch.tier_label.clone());
        self.is_featured = patch.is_featured;
        self.is_premium = patch.is_premium;
        self.price_per_hour = Some(patch.prices.price_per_hour);
        self.price_30_min = Some(patch.prices.price_30_min);
        self.price_45_min = Some(patch.prices.price_45_min);
        self.price_1_hour = Some(patch.prices.price_1_hour);
    }
}

/// Tier fields of one advertisement, keyed by id.
///
/// This is what persistence layers upsert after a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TierPatch {
    pub id: AdId,
    pub tier: Tier,
    pub tier_label: String,
    pub is_featured: bool,
    pub is_premium: bool,
    #[serde(flatten)]
    pub prices: DerivedPrices,
}

impl<'de> Deserialize<'de> for Advertisement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        StoredAdvertisement::deserialize(deserializer)?
            .into_advertisement()
            .map_err(serde::de::Error::custom)
    }
}

/// A record as found in a store, canonical and legacy names side by side.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAdvertisement {
    id: AdId,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    categoria: Option<Category>,
    #[serde(default, deserialize_with = "deserialize_price")]
    base_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_price")]
    preco: Option<f64>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tier: Option<Tier>,
    #[serde(default)]
    tier_label: Option<String>,
    #[serde(default)]
    is_featured: bool,
    #[serde(default)]
    is_premium: bool,
    #[serde(default)]
    price_per_hour: Option<Price>,
    #[serde(default, rename = "price30Min")]
    price_30_min: Option<Price>,
    #[serde(default, rename = "price45Min")]
    price_45_min: Option<Price>,
    #[serde(default, rename = "price1Hour")]
    price_1_hour: Option<Price>,
    #[serde(flatten)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

impl StoredAdvertisement {
    /// Merge the canonical and legacy fields. Either name may be present;
    /// when both are, they must agree.
    fn into_advertisement(self) -> Result<Advertisement, String> {
        let category = match (self.category, self.categoria) {
            (Some(category), Some(legacy)) if category != legacy => {
                return Err(format!(
                    "advertisement {}: category `{}` conflicts with categoria `{}`",
                    self.id, category, legacy
                ));
            }
            (Some(category), _) | (None, Some(category)) => category,
            (None, None) => return Err("missing field `category`".to_string()),
        };

        let base_price = match (self.base_price, self.preco) {
            (Some(price), Some(legacy)) if !same_price(price, legacy) => {
                return Err(format!(
                    "advertisement {}: basePrice {} conflicts with preco {}",
                    self.id, price, legacy
                ));
            }
            (Some(price), _) | (None, Some(price)) => Some(price),
            (None, None) => None,
        };

        Ok(Advertisement {
            id: self.id,
            category,
            base_price,
            created_at: self.created_at,
            tier: self.tier,
            tier_label: self.tier_label,
            is_featured: self.is_featured,
            is_premium: self.is_premium,
            price_per_hour: self.price_per_hour,
            price_30_min: self.price_30_min,
            price_45_min: self.price_45_min,
            price_1_hour: self.price_1_hour,
            attributes: self.attributes,
        })
    }
}

/// Unparseable text on both sides counts as agreeing.
fn same_price(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Accepts numbers, numeric strings and null. Blank strings count as absent;
/// unparseable strings become NaN so the engine rejects them as non-finite.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPrice>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawPrice::Number(n)) => Some(n),
        Some(RawPrice::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
    })
}
