//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.
//! A missing token or channel is not an error: the relay simply stays
//! inactive until both are set.

use crate::common::error::ConfigError;
use crate::common::messages::COMMAND_PREFIX;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    let channel = config.discord.channel.trim();
    if !channel.is_empty() && !matches!(channel.parse::<u64>(), Ok(id) if id != 0) {
        errors.push(format!(
            "discord.channel must be a non-zero numeric channel id (got '{}')",
            config.discord.channel
        ));
    }

    if config.relay.drain_interval_ms == 0 {
        errors.push("relay.drain_interval_ms must be non-zero".to_string());
    }
    if config.relay.drain_batch_size == 0 {
        errors.push("relay.drain_batch_size must be non-zero".to_string());
    }
    if config.relay.queue_capacity == 0 {
        errors.push("relay.queue_capacity must be non-zero".to_string());
    }

    for (i, command) in config.relay.supported_commands().iter().enumerate() {
        if !command.starts_with(COMMAND_PREFIX) || command.split_whitespace().count() != 1 {
            errors.push(format!(
                "relay.supported_commands[{}] '{}' must be a single word starting with '{}'",
                i, command, COMMAND_PREFIX
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
