//! Configuration system for the MBM session-token cache.
//!
//! Provides TOML-based configuration with:
//! - A `[session]` table describing TTL, capacity and sweeping
//! - Config file layering (user config dir + project-local overrides)
//! - Validation of values the cache cannot work with

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigLayers, LoadedConfig, load_config, load_config_file, load_layers, save_config,
    user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
