//! Assign tiers and derived prices across the catalog.

use std::time::Instant;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use vitrine_core::prelude::*;
use vitrine_observability::StructuredLogger;
use vitrine_store::{AdStore, JsonFileStore};

use super::AssignArgs;
use crate::context::Context;
use crate::output::RowStatus;

/// Run the assign command.
pub async fn run(args: AssignArgs, ctx: &Context) -> Result<()> {
    let started = Instant::now();
    let data_file = ctx.data_file(args.data.as_deref())?;
    let engine = ctx.config.engine()?;
    let log = ctx.logger("assign");

    let store = JsonFileStore::open(&data_file)
        .await
        .with_context(|| format!("Failed to open data file: {}", data_file.display()))?;

    let categories = match args.category.as_deref() {
        Some(name) => match Category::from_str(name) {
            Some(category) => vec![category],
            None => bail!(
                "Unknown category '{}'. Expected one of: {}",
                name,
                Category::ALL.map(|c| c.as_str()).join(", ")
            ),
        },
        None => store.categories().await?,
    };

    log.info_builder("Run started")
        .field("data_file", data_file.display().to_string())
        .field_usize("categories", categories.len())
        .field_bool("dry_run", args.dry_run)
        .emit();

    ctx.output.header("Assigning tiers");
    ctx.output.kv("Data", &data_file.display().to_string());
    ctx.output.kv("Run", log.run_id().as_str());

    let pb = ctx.output.category_progress(categories.len());
    let mut run = CatalogRun::default();

    for category in categories {
        pb.set_message(category.to_string());
        let ads = store
            .list_category(category)
            .await
            .with_context(|| format!("Failed to list category {}", category))?;

        let outcome = CategoryOutcome::run(&engine, category, &ads);
        log_outcome(&log.for_category(category), &outcome);
        run.outcomes.push(outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut report = AssignReport::new(&log, &run, args.dry_run);
    print_summary(&report, ctx);

    if run.outcomes.is_empty() {
        ctx.output.info("No advertisements found.");
    } else if args.dry_run {
        ctx.output.info("Dry run, nothing written.");
    } else if let Some(path) = args.output.as_deref() {
        let path = ctx.resolve_path(path);
        let ads = run.clone().into_ads();
        JsonFileStore::create(&path, &ads)
            .await
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;

        log.info_builder("Tiered records written")
            .field("output", path.display().to_string())
            .field_usize("records", ads.len())
            .emit();
        ctx.output
            .success(&format!("Wrote {} records to {}", ads.len(), path.display()));
        report.written = Some(ads.len());
    } else {
        let patches = run.patches();
        if patches.is_empty() {
            ctx.output.warn("No category could be tiered, nothing to write.");
        } else if confirmed(&args, patches.len(), &data_file.display().to_string())? {
            let outcome = store
                .apply_patches(&patches)
                .await
                .with_context(|| format!("Failed to update data file: {}", data_file.display()))?;

            log.info_builder("Patches applied")
                .field_usize("applied", outcome.applied)
                .field_usize("missing", outcome.missing.len())
                .emit();
            for id in &outcome.missing {
                log.warn_builder("Record vanished before write-back")
                    .field("id", id.as_str())
                    .emit();
                ctx.output.warn(&format!("Record not found: {}", id));
            }

            ctx.output
                .success(&format!("Updated {} records", outcome.applied));
            report.written = Some(outcome.applied);
            report.missing = outcome.missing.iter().map(|id| id.to_string()).collect();
        } else {
            ctx.output.warn("Assignment cancelled");
        }
    }

    log.info_builder("Run finished")
        .field_usize("tiered", run.tiered().count())
        .field_usize("skipped", run.skipped().count())
        .duration_ms("duration_ms", started.elapsed())
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&report);
    }

    Ok(())
}

fn confirmed(args: &AssignArgs, patches: usize, target: &str) -> Result<bool> {
    if args.yes {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Write {} tier updates to {}?", patches, target))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn log_outcome(log: &StructuredLogger, outcome: &CategoryOutcome) {
    match outcome {
        CategoryOutcome::Tiered { distribution, .. } => {
            log.info_builder("Category tiered")
                .field_usize("n1", distribution.n1)
                .field_usize("n3", distribution.n3)
                .field_usize("n7", distribution.n7)
                .emit();
        }
        CategoryOutcome::Skipped {
            input_len, error, ..
        } => {
            log.warn_builder("Category skipped")
                .field("error", error.to_string())
                .field("id", error.ad_id().as_str())
                .field_usize("records", *input_len)
                .emit();
        }
    }
}

fn print_summary(report: &AssignReport, ctx: &Context) {
    if ctx.output.is_json() {
        return;
    }

    ctx.output.distribution_header();
    for row in &report.categories {
        let status = if row.distribution.is_some() {
            RowStatus::Tiered
        } else {
            RowStatus::Skipped
        };
        ctx.output
            .distribution_row(row.category.as_str(), Some(status), row.distribution.as_ref());
    }
    ctx.output.distribution_row("total", None, Some(&report.total));

    for row in &report.categories {
        if let Some(error) = &row.error {
            ctx.output.warn(&format!("{}: {}", row.category, error));
        }
    }
}

/// Machine-readable result of an assign run.
#[derive(Debug, Serialize)]
struct AssignReport {
    run_id: String,
    dry_run: bool,
    categories: Vec<CategoryRow>,
    total: TierDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    category: Category,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<TierDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AssignReport {
    fn new(log: &StructuredLogger, run: &CatalogRun, dry_run: bool) -> Self {
        let categories = run
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                CategoryOutcome::Tiered {
                    category,
                    distribution,
                    ..
                } => CategoryRow {
                    category: *category,
                    status: "tiered",
                    distribution: Some(*distribution),
                    error: None,
                },
                CategoryOutcome::Skipped {
                    category, error, ..
                } => CategoryRow {
                    category: *category,
                    status: "skipped",
                    distribution: None,
                    error: Some(error.to_string()),
                },
            })
            .collect();

        Self {
            run_id: log.run_id().to_string(),
            dry_run,
            categories,
            total: run.distribution(),
            written: None,
            missing: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;
    use vitrine_observability::RunId;

    fn context(dir: &std::path::Path) -> Context {
        Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }

    fn args(dry_run: bool, output: Option<&str>) -> AssignArgs {
        AssignArgs {
            data: Some("anuncios.json".to_string()),
            category: None,
            dry_run,
            output: output.map(String::from),
            yes: true,
        }
    }

    async fn seed(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("anuncios.json");
        let ads: Vec<Advertisement> = (0..50)
            .map(|i| Advertisement::new(format!("m-{i}"), Category::Mulheres, Some(300.0)))
            .chain(std::iter::once(Advertisement::new(
                "h-bad",
                Category::Homens,
                Some(-5.0),
            )))
            .collect();
        JsonFileStore::create(&path, &ads).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_assign_writes_back_valid_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path()).await;
        let ctx = context(dir.path());

        run(args(false, None), &ctx).await.unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let women = store.list_category(Category::Mulheres).await.unwrap();
        let dist = TierDistribution::from_ads(&women);
        assert_eq!((dist.n1, dist.n3, dist.n7), (29, 15, 6));
        assert_eq!(women[0].price_30_min, Some(Price::new(360)));

        // the invalid category is left alone
        let men = store.list_category(Category::Homens).await.unwrap();
        assert!(!men[0].is_tiered());
    }

    #[tokio::test]
    async fn test_assign_dry_run_and_output_leave_data_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path()).await;
        let before = std::fs::read_to_string(&path).unwrap();
        let ctx = context(dir.path());

        run(args(true, None), &ctx).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

        run(args(false, Some("tiered.json")), &ctx).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

        let out = JsonFileStore::open(dir.path().join("tiered.json")).await.unwrap();
        let ads = out.list_all().await.unwrap();
        assert_eq!(ads.len(), 50);
        assert!(ads.iter().all(|a| a.is_tiered()));
    }

    #[tokio::test]
    async fn test_assign_unknown_category_fails() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path()).await;
        let ctx = context(dir.path());

        let mut args = args(true, None);
        args.category = Some("robots".to_string());
        assert!(run(args, &ctx).await.is_err());
    }

    #[test]
    fn test_report_rows_follow_outcomes() {
        let engine = TierEngine::default();
        let ads = vec![
            Advertisement::new("m-1", Category::Mulheres, Some(100.0)),
            Advertisement::new("t-1", Category::Trans, Some(-1.0)),
        ];
        let run = assign_catalog(&engine, ads);
        let log = StructuredLogger::new(RunId::from_string("run-test"));

        let report = AssignReport::new(&log, &run, true);
        assert_eq!(report.run_id, "run-test");
        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].status, "tiered");
        assert_eq!(report.categories[1].status, "skipped");
        assert!(report.categories[1].error.is_some());
        assert_eq!(report.total.n1, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"][0]["category"], "mulheres");
        assert_eq!(json["categories"][0]["distribution"]["n1"], 1);
        assert!(json.get("written").is_none());
    }
}
