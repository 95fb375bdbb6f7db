//! Supported inbound commands.

use std::collections::HashSet;

use crate::config::types::{RelayConfig, DEFAULT_SUPPORTED_COMMANDS};

/// Notice posted back to the remote channel for an unknown command.
pub const UNSUPPORTED_COMMAND_NOTICE: &str = "Command not supported";

/// Immutable set of command names that may be forwarded to the game.
#[derive(Debug, Clone)]
pub struct SupportedCommands {
    names: HashSet<String>,
}

impl Default for SupportedCommands {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_COMMANDS)
    }
}

impl SupportedCommands {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.supported_commands())
    }

    /// Exact match on the command token, e.g. `//skip`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
