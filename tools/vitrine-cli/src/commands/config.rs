//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use serde_json::{json, Value};
use vitrine_core::tier::{MissingPricePolicy, Tier, TierSpec, DEFAULT_MISSING_PRICE};
use vitrine_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv(
        "data_file",
        ctx.config.store.data_file.as_deref().unwrap_or("-"),
    );

    for tier in Tier::ALL {
        let spec = ctx.config.tiers.spec(tier);
        ctx.output.info("");
        ctx.output.info(&format!("[tiers.{}]", tier.as_str().to_lowercase()));
        ctx.output.kv("quota", &format_quota(spec));
        ctx.output.kv("label", &spec.label);
        ctx.output.kv("multiplier", &spec.multiplier.to_string());
    }

    ctx.output.info("");
    ctx.output.info("[pricing.missing_price]");
    match ctx.config.pricing.missing_price {
        MissingPricePolicy::Default { price } => {
            ctx.output.kv("policy", "default");
            ctx.output.kv("price", &price.to_string());
        }
        MissingPricePolicy::Reject => ctx.output.kv("policy", "reject"),
        MissingPricePolicy::Skip => ctx.output.kv("policy", "skip"),
    }

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_str());
    ctx.output.kv("format", ctx.config.logging.format.as_str());

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "key": key, "value": value }));
    } else {
        match value {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(ref config_path) = ctx.config_path else {
        bail!("No config file found. Run `vitrine config init` to create one.");
    };

    let mut config = ctx.config.clone();
    set_config_value(&mut config, key, value)?;
    config
        .validate()
        .with_context(|| format!("Refusing to set {} = {}", key, value))?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.tiers.validate() {
        errors.push(format!("tiers: {}", e));
    }
    if let Err(e) = ctx.config.pricing.missing_price.validate() {
        errors.push(format!("pricing: {}", e));
    }

    let tiers = &ctx.config.tiers;
    if tiers.n7.quota.is_some() {
        warnings.push("tiers.n7.quota is ignored; N7 takes every remaining record".to_string());
    }
    if tiers.n1.multiplier < tiers.n3.multiplier || tiers.n3.multiplier < tiers.n7.multiplier {
        warnings.push("tier multipliers are not ordered n1 >= n3 >= n7".to_string());
    }
    if tiers.n1.quota == Some(0) && tiers.n3.quota == Some(0) {
        warnings.push("n1 and n3 quotas are both 0; every record lands in N7".to_string());
    }

    match ctx.data_file(None) {
        Ok(path) if !path.exists() => {
            warnings.push(format!("store.data_file does not exist: {}", path.display()))
        }
        Ok(_) => {}
        Err(_) => warnings.push("store.data_file is not set; pass --data to commands".to_string()),
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn format_quota(spec: &TierSpec) -> String {
    spec.quota
        .map(|q| q.to_string())
        .unwrap_or_else(|| "unlimited".to_string())
}

fn parse_tier(name: &str, key: &str) -> Result<Tier> {
    Tier::from_str(name).with_context(|| format!("Unknown config key: {}", key))
}

fn tier_spec_mut(config: &mut CliConfig, tier: Tier) -> &mut TierSpec {
    match tier {
        Tier::N1 => &mut config.tiers.n1,
        Tier::N3 => &mut config.tiers.n3,
        Tier::N7 => &mut config.tiers.n7,
    }
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<Value> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["store", "data_file"] => json!(config.store.data_file),
        ["tiers", tier, field] => {
            let spec = config.tiers.spec(parse_tier(tier, key)?);
            match *field {
                "quota" => json!(spec.quota),
                "label" => json!(spec.label),
                "multiplier" => json!(spec.multiplier),
                _ => bail!("Unknown config key: {}", key),
            }
        }
        ["pricing", "missing_price"] | ["pricing", "missing_price", "policy"] => {
            json!(policy_name(&config.pricing.missing_price))
        }
        ["pricing", "missing_price", "price"] => match config.pricing.missing_price {
            MissingPricePolicy::Default { price } => json!(price),
            _ => Value::Null,
        },
        ["logging", "level"] => json!(config.logging.level.as_str()),
        ["logging", "format"] => json!(config.logging.format.as_str()),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "data_file"] => config.store.data_file = Some(value.to_string()),
        ["tiers", tier, field] => {
            let tier = parse_tier(tier, key)?;
            let spec = tier_spec_mut(config, tier);
            match *field {
                "quota" => {
                    spec.quota = match value {
                        "none" | "unlimited" => None,
                        n => Some(n.parse().with_context(|| {
                            format!("{} must be a count or 'unlimited'", key)
                        })?),
                    }
                }
                "label" => spec.label = value.to_string(),
                "multiplier" => {
                    spec.multiplier = value
                        .parse()
                        .with_context(|| format!("{} must be a number", key))?
                }
                _ => bail!("Unknown config key: {}", key),
            }
        }
        ["pricing", "missing_price"] | ["pricing", "missing_price", "policy"] => {
            config.pricing.missing_price = match value {
                "default" => match config.pricing.missing_price {
                    keep @ MissingPricePolicy::Default { .. } => keep,
                    _ => MissingPricePolicy::Default {
                        price: DEFAULT_MISSING_PRICE,
                    },
                },
                "reject" => MissingPricePolicy::Reject,
                "skip" => MissingPricePolicy::Skip,
                other => bail!(
                    "Unknown missing price policy '{}'. Expected default, reject or skip",
                    other
                ),
            }
        }
        ["pricing", "missing_price", "price"] => {
            let price = value
                .parse()
                .with_context(|| format!("{} must be a whole number", key))?;
            config.pricing.missing_price = MissingPricePolicy::Default { price };
        }
        ["logging", "level"] => {
            config.logging.level = LogLevel::from_str(value)
                .with_context(|| format!("Unknown log level: {}", value))?
        }
        ["logging", "format"] => {
            config.logging.format = LogFormat::from_str(value)
                .with_context(|| format!("Unknown log format: {}", value))?
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

fn policy_name(policy: &MissingPricePolicy) -> &'static str {
    match policy {
        MissingPricePolicy::Default { .. } => "default",
        MissingPricePolicy::Reject => "reject",
        MissingPricePolicy::Skip => "skip",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tier_values() {
        let config = CliConfig::default();
        assert_eq!(get_config_value(&config, "tiers.n1.quota").unwrap(), json!(29));
        assert_eq!(get_config_value(&config, "tiers.n7.quota").unwrap(), Value::Null);
        assert_eq!(
            get_config_value(&config, "tiers.n3.label").unwrap(),
            json!("Destaque")
        );
        assert_eq!(
            get_config_value(&config, "pricing.missing_price.price").unwrap(),
            json!(300)
        );
        assert!(get_config_value(&config, "tiers.n2.quota").is_err());
        assert!(get_config_value(&config, "nope").is_err());
    }

    #[test]
    fn test_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "tiers.n1.quota", "10").unwrap();
        set_config_value(&mut config, "tiers.n3.quota", "unlimited").unwrap();
        set_config_value(&mut config, "tiers.n7.multiplier", "0.9").unwrap();
        set_config_value(&mut config, "logging.format", "human").unwrap();
        set_config_value(&mut config, "store.data_file", "ads.json").unwrap();

        assert_eq!(config.tiers.n1.quota, Some(10));
        assert_eq!(config.tiers.n3.quota, None);
        assert_eq!(config.tiers.n7.multiplier, 0.9);
        assert_eq!(config.logging.format, LogFormat::Human);
        assert_eq!(config.store.data_file.as_deref(), Some("ads.json"));

        assert!(set_config_value(&mut config, "tiers.n1.quota", "many").is_err());
        assert!(set_config_value(&mut config, "logging.level", "loud").is_err());
    }

    #[test]
    fn test_set_missing_price_policy() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "pricing.missing_price.price", "250").unwrap();
        set_config_value(&mut config, "pricing.missing_price", "default").unwrap();
        assert_eq!(
            config.pricing.missing_price,
            MissingPricePolicy::Default { price: 250 }
        );

        set_config_value(&mut config, "pricing.missing_price.policy", "skip").unwrap();
        assert_eq!(config.pricing.missing_price, MissingPricePolicy::Skip);
        assert_eq!(
            get_config_value(&config, "pricing.missing_price").unwrap(),
            json!("skip")
        );

        set_config_value(&mut config, "pricing.missing_price", "default").unwrap();
        assert_eq!(
            config.pricing.missing_price,
            MissingPricePolicy::Default {
                price: DEFAULT_MISSING_PRICE
            }
        );
    }
}
