//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `HERALD_DISCORD_TOKEN` - Discord bot token
//! - `HERALD_DISCORD_CHANNEL` - Target channel id
//! - `HERALD_DISCORD_ADMINS` - Admin list

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "HERALD";

/// Apply environment variable overrides to a config.
///
/// This allows the bot token to be provided via the environment instead of
/// the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }
    if let Ok(channel) = env::var(format!("{}_DISCORD_CHANNEL", ENV_PREFIX)) {
        config.discord.channel = channel;
    }
    if let Ok(admins) = env::var(format!("{}_DISCORD_ADMINS", ENV_PREFIX)) {
        config.discord.admins = admins;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `HERALD_CONFIG` environment variable, otherwise returns "herald.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "herald.conf".to_string())
}
