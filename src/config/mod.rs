//! Configuration parsing, validation and live settings.

pub mod env;
pub mod parser;
pub mod settings;
pub mod types;
pub mod validate;

use std::path::Path;

use crate::common::error::ConfigError;

pub use parser::{load_config, load_config_str};
pub use settings::{RelaySettings, SettingsStore};
pub use types::*;
pub use validate::validate_config;

/// Load a config file, apply environment overrides and validate the result.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let config = env::apply_env_overrides(load_config(path)?);
    validate_config(&config)?;
    Ok(config)
}
