//! Terminal and JSON output for the CLI.
//!
//! With `--json`, stdout carries one JSON document per command and every
//! human-oriented line is suppressed; errors still reach stderr, as JSON.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use vitrine_core::tier::{Tier, TierDistribution};

const NAME_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 10;
const TIER_WIDTH: usize = 5;
const UNASSIGNED_WIDTH: usize = 10;

#[derive(Clone, Copy)]
enum Mark {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Mark {
    fn symbol(self) -> StyledObject<&'static str> {
        match self {
            Mark::Info => style("ℹ").blue(),
            Mark::Success => style("✓").green(),
            Mark::Warn => style("⚠").yellow(),
            Mark::Error => style("✗").red(),
            Mark::Debug => style("→").dim(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Mark::Warn | Mark::Error | Mark::Debug)
    }
}

/// State of one category row in a distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Tiered by this run.
    Tiered,
    /// Left out of this run after failing validation.
    Skipped,
    /// Stored tiers respect the quotas.
    WithinQuota,
    /// Stored tiers hold more records than a quota allows.
    OverQuota,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Tiered => "tiered",
            RowStatus::Skipped => "skipped",
            RowStatus::WithinQuota => "ok",
            RowStatus::OverQuota => "over quota",
        }
    }

    /// Padded first, so colour codes do not break column alignment.
    fn cell(&self) -> String {
        let padded = format!("{:width$}", self.as_str(), width = STATUS_WIDTH);
        match self {
            RowStatus::Tiered | RowStatus::WithinQuota => style(padded).green().to_string(),
            RowStatus::Skipped => style(padded).red().to_string(),
            RowStatus::OverQuota => style(padded).yellow().to_string(),
        }
    }
}

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn say(&self, mark: Mark, msg: &str) {
        if self.json {
            return;
        }
        let line = match mark {
            Mark::Error => format!("{} {}", mark.symbol(), style(msg).red()),
            Mark::Debug => format!("{} {}", mark.symbol(), style(msg).dim()),
            _ => format!("{} {}", mark.symbol(), msg),
        };
        if mark.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn info(&self, msg: &str) {
        self.say(Mark::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.say(Mark::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.say(Mark::Warn, msg);
    }

    /// Print an error; a `{"error": ...}` object on stderr in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        self.say(Mark::Error, msg);
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.say(Mark::Debug, msg);
        }
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Column titles of a tier distribution table.
    pub fn distribution_header(&self) {
        if self.json {
            return;
        }
        println!(
            "\n  {}",
            style(distribution_line(
                "CATEGORY",
                &format!("{:width$}", "STATUS", width = STATUS_WIDTH),
                ["N1", "N3", "N7"].map(String::from),
                "UNASSIGNED",
                "TOTAL",
            ))
            .bold()
        );
    }

    /// One row of a tier distribution table. A row without counts (a skipped
    /// category) shows dashes.
    pub fn distribution_row(
        &self,
        name: &str,
        status: Option<RowStatus>,
        dist: Option<&TierDistribution>,
    ) {
        if self.json {
            return;
        }
        let status = status
            .map(|s| s.cell())
            .unwrap_or_else(|| " ".repeat(STATUS_WIDTH));
        let line = match dist {
            Some(d) => distribution_line(
                name,
                &status,
                Tier::ALL.map(|tier| d.count(tier).to_string()),
                &d.unassigned.to_string(),
                &d.total().to_string(),
            ),
            None => distribution_line(name, &status, ["-", "-", "-"].map(String::from), "-", "-"),
        };
        println!("  {}", line);
    }

    /// Progress over the categories of a run; hidden in JSON mode.
    pub fn category_progress(&self, categories: usize) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(categories as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} categories {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn distribution_line(
    name: &str,
    status: &str,
    tiers: [String; 3],
    unassigned: &str,
    total: &str,
) -> String {
    let [n1, n3, n7] = tiers;
    format!(
        "{:nw$}  {}  {:tw$}  {:tw$}  {:tw$}  {:uw$}  {}",
        name,
        status,
        n1,
        n3,
        n7,
        unassigned,
        total,
        nw = NAME_WIDTH,
        tw = TIER_WIDTH,
        uw = UNASSIGNED_WIDTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_line_alignment() {
        let header = distribution_line(
            "CATEGORY",
            "STATUS    ",
            ["N1", "N3", "N7"].map(String::from),
            "UNASSIGNED",
            "TOTAL",
        );
        let row = distribution_line(
            "massagistas",
            "tiered    ",
            ["29", "15", "6"].map(String::from),
            "0",
            "50",
        );
        assert_eq!(header.find("N1"), row.find("29"));
        assert_eq!(header.find("TOTAL"), row.find("50"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(RowStatus::OverQuota.as_str(), "over quota");
        assert_eq!(RowStatus::Skipped.as_str(), "skipped");
    }
}
