//! Tier quotas, labels and multipliers.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tier::Tier;

/// Base price used for records without one under the default policy.
pub const DEFAULT_MISSING_PRICE: i64 = 300;

/// Settings for one tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierSpec {
    /// Maximum advertisements per category in this tier (None = unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<usize>,
    /// Display label written to `tierLabel`.
    pub label: String,
    /// Factor applied to the base price.
    pub multiplier: f64,
}

impl TierSpec {
    pub fn new(quota: Option<usize>, label: impl Into<String>, multiplier: f64) -> Self {
        Self {
            quota,
            label: label.into(),
            multiplier,
        }
    }

    fn validate(&self, tier: Tier) -> Result<(), ConfigError> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier {
                tier: tier.to_string(),
                multiplier: self.multiplier,
            });
        }
        if self.label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel(tier.to_string()));
        }
        Ok(())
    }
}

/// Configuration shared by every category in a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierConfig {
    #[serde(default = "TierConfig::default_n1")]
    pub n1: TierSpec,
    #[serde(default = "TierConfig::default_n3")]
    pub n3: TierSpec,
    /// The remainder tier. Its quota is ignored.
    #[serde(default = "TierConfig::default_n7")]
    pub n7: TierSpec,
}

impl TierConfig {
    fn default_n1() -> TierSpec {
        TierSpec::new(Some(29), "Premium VIP", 2.0)
    }

    fn default_n3() -> TierSpec {
        TierSpec::new(Some(15), "Destaque", 1.5)
    }

    fn default_n7() -> TierSpec {
        TierSpec::new(None, "Padrão", 1.0)
    }

    /// Settings for a tier.
    pub fn spec(&self, tier: Tier) -> &TierSpec {
        match tier {
            Tier::N1 => &self.n1,
            Tier::N3 => &self.n3,
            Tier::N7 => &self.n7,
        }
    }

    /// Check multipliers and labels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            self.spec(tier).validate(tier)?;
        }
        Ok(())
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            n1: Self::default_n1(),
            n3: Self::default_n3(),
            n7: Self::default_n7(),
        }
    }
}

/// What to do with a record that has no base price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MissingPricePolicy {
    /// Price it as if it had this base price.
    Default { price: i64 },
    /// Fail the whole category.
    Reject,
    /// Leave it out of the run; it takes no quota slot.
    Skip,
}

impl MissingPricePolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MissingPricePolicy::Default { price } if *price < 0 => {
                Err(ConfigError::InvalidDefaultPrice(*price))
            }
            _ => Ok(()),
        }
    }
}

impl Default for MissingPricePolicy {
    fn default() -> Self {
        MissingPricePolicy::Default {
            price: DEFAULT_MISSING_PRICE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TierConfig::default();
        assert_eq!(config.n1.quota, Some(29));
        assert_eq!(config.n3.quota, Some(15));
        assert_eq!(config.n7.quota, None);
        assert_eq!(config.spec(Tier::N3).label, "Destaque");
        assert_eq!(config.spec(Tier::N7).label, "Padrão");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_multiplier() {
        let mut config = TierConfig::default();
        config.n3.multiplier = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiplier { .. })
        ));

        config.n3.multiplier = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_label() {
        let mut config = TierConfig::default();
        config.n1.label = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyLabel("N1".to_string()))
        );
    }

    #[test]
    fn test_missing_price_policy_serde() {
        let policy: MissingPricePolicy =
            serde_json::from_str(r#"{"policy": "default", "price": 250}"#).unwrap();
        assert_eq!(policy, MissingPricePolicy::Default { price: 250 });

        let policy: MissingPricePolicy = serde_json::from_str(r#"{"policy": "skip"}"#).unwrap();
        assert_eq!(policy, MissingPricePolicy::Skip);

        assert!(MissingPricePolicy::Default { price: -1 }.validate().is_err());
        assert_eq!(
            MissingPricePolicy::default(),
            MissingPricePolicy::Default { price: 300 }
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TierConfig =
            serde_json::from_str(r#"{"n1": {"quota": 10, "label": "VIP", "multiplier": 3.0}}"#)
                .unwrap();
        assert_eq!(config.n1.quota, Some(10));
        assert_eq!(config.n3, TierConfig::default().n3);
    }
}
