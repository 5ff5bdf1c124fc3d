//! CLI command handlers.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use mbm_config::LoadedConfig;
use tracing::warn;

pub mod config;
pub mod soak;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file from `--config` / `MBM_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Merge the discovered config layers with the explicit file, if any.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = mbm_config::load_config(self.config_path.as_deref()).with_context(|| {
            match &self.config_path {
                Some(path) => format!("loading config with {}", path.display()),
                None => "loading config".to_string(),
            }
        })?;

        for warning in &loaded.warnings {
            warn!("{warning}");
        }

        Ok(loaded)
    }
}
