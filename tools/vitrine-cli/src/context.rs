//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use vitrine_observability::{LogLevel, RunId, StructuredLogger};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }

    /// The data file from `--data`, else from `[store] data_file`.
    ///
    /// A path from the config file is relative to that file's directory.
    pub fn data_file(&self, arg: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = arg {
            return Ok(self.resolve_path(path));
        }

        match (&self.config.store.data_file, &self.config_path) {
            (Some(file), Some(config_path)) => {
                let base = config_path.parent().unwrap_or(self.cwd.as_path());
                Ok(resolve(base, file))
            }
            (Some(file), None) => Ok(self.resolve_path(file)),
            (None, _) => bail!("No data file given. Pass --data or set [store] data_file."),
        }
    }

    /// A run logger for a command, following the `[logging]` section.
    pub fn logger(&self, command: &str) -> StructuredLogger {
        let level = if self.output.is_verbose() {
            self.config.logging.level.min(LogLevel::Debug)
        } else {
            self.config.logging.level
        };

        StructuredLogger::new(RunId::generate())
            .with_command(command)
            .with_min_level(level)
            .with_format(self.config.logging.format)
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    }
}
