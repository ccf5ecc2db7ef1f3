//! Stored tier distribution per category.

use anyhow::{Context as _, Result};
use serde::Serialize;
use vitrine_core::prelude::*;
use vitrine_store::{AdStore, JsonFileStore};

use super::ReportArgs;
use crate::context::Context;
use crate::output::RowStatus;

#[derive(Debug, Serialize)]
struct CategoryReport {
    category: Category,
    #[serde(flatten)]
    distribution: TierDistribution,
    /// Tiers holding more records than the configured quota.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    over_quota: Vec<Tier>,
}

#[derive(Debug, Serialize)]
struct Report {
    categories: Vec<CategoryReport>,
    total: TierDistribution,
}

/// Run the report command.
pub async fn run(args: ReportArgs, ctx: &Context) -> Result<()> {
    let data_file = ctx.data_file(args.data.as_deref())?;
    let store = JsonFileStore::open(&data_file)
        .await
        .with_context(|| format!("Failed to open data file: {}", data_file.display()))?;

    let report = build_report(&store, &ctx.config.tiers).await?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Tier distribution");
    ctx.output.kv("Data", &data_file.display().to_string());

    if report.categories.is_empty() {
        ctx.output.info("No advertisements found.");
        return Ok(());
    }

    ctx.output.distribution_header();
    for row in &report.categories {
        let status = if row.over_quota.is_empty() {
            RowStatus::WithinQuota
        } else {
            RowStatus::OverQuota
        };
        ctx.output
            .distribution_row(row.category.as_str(), Some(status), Some(&row.distribution));
    }
    ctx.output.distribution_row("total", None, Some(&report.total));

    for row in report.categories.iter().filter(|r| !r.over_quota.is_empty()) {
        let tiers: Vec<&str> = row.over_quota.iter().map(|t| t.as_str()).collect();
        ctx.output.warn(&format!(
            "{} holds more {} records than its quota allows; records left out of a run keep their old tier.",
            row.category,
            tiers.join("/")
        ));
    }

    if !report.total.is_fully_assigned() {
        ctx.output.info("");
        ctx.output.warn(&format!(
            "{} record(s) have no tier. Run `vitrine assign` to tier them.",
            report.total.unassigned
        ));
    }

    Ok(())
}

async fn build_report(store: &dyn AdStore, tiers: &TierConfig) -> Result<Report> {
    let mut categories = Vec::new();
    let mut total = TierDistribution::default();

    for category in store.categories().await? {
        let ads = store.list_category(category).await?;
        let distribution = TierDistribution::from_ads(&ads);
        total += distribution;
        categories.push(CategoryReport {
            category,
            distribution,
            over_quota: distribution.over_quota(tiers),
        });
    }

    Ok(Report { categories, total })
}
