//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vitrine_core::tier::{MissingPricePolicy, TierConfig, TierEngine};
use vitrine_observability::{LogFormat, LogLevel};

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["vitrine.toml", ".vitrine.toml", "vitrine.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Data store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Tier quotas, labels and multipliers.
    #[serde(default)]
    pub tiers: TierConfig,

    /// Pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Run log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Check the tier and pricing sections.
    pub fn validate(&self) -> Result<()> {
        self.tiers.validate().context("Invalid [tiers] section")?;
        self.pricing
            .missing_price
            .validate()
            .context("Invalid [pricing] section")?;
        Ok(())
    }

    /// Build the tier engine described by this config.
    pub fn engine(&self) -> Result<TierEngine> {
        self.validate()?;
        Ok(TierEngine::new(self.tiers.clone()).with_missing_price(self.pricing.missing_price))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Data store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding the advertisement records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,
}

/// Pricing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// What to do with records that have no base price.
    #[serde(default)]
    pub missing_price: MissingPricePolicy,
}

/// Run log settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level written (default: info).
    #[serde(default)]
    pub level: LogLevel,

    /// `json` or `human` (default: json).
    #[serde(default)]
    pub format: LogFormat,
}

/// Generate a default vitrine.toml config file.
pub fn generate_default_config() -> String {
    r#"# Vitrine tiering configuration

[store]
# data_file = "anuncios.json"

# Quotas apply to each category separately, in the order the
# store returns it (oldest first).
[tiers.n1]
quota = 29
label = "Premium VIP"
multiplier = 2.0

[tiers.n3]
quota = 15
label = "Destaque"
multiplier = 1.5

# Everything past the N1 and N3 quotas.
[tiers.n7]
label = "Padrão"
multiplier = 1.0

# policy = "default" | "reject" | "skip"
[pricing.missing_price]
policy = "default"
price = 300

[logging]
level = "info"
format = "human"
"#
    .to_string()
}
