//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rewrite_core::RewriterConfig;

use crate::config::{self, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Rewriter configuration.
    pub config: RewriterConfig,
    /// Where the config was loaded from, if anywhere.
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
            let path = PathBuf::from(path);
            (config::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => (config::load(&path)?, Some(path)),
                None => (RewriterConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
