//! Configuration type definitions.

use serde::Deserialize;

use crate::game::formatter::{
    DEFAULT_CHAT_FORMAT, DEFAULT_JOIN_FORMAT, DEFAULT_LEAVE_FORMAT, DEFAULT_MAP_START_FORMAT,
    DEFAULT_NOTICE_FORMAT, DEFAULT_SERVER_CHAT_FORMAT,
};

/// Commands admins may run from the remote channel unless overridden.
pub const DEFAULT_SUPPORTED_COMMANDS: [&str; 15] = [
    "//skip",
    "//mute",
    "//unmute",
    "//kick",
    "//ban",
    "//unban",
    "//mx",
    "//reboot",
    "//setpassword",
    "//setspecpassword",
    "//chat",
    "//writemaplist",
    "//restart",
    "//mxpack",
    "/version",
];

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub formats: FormatsConfig,
}

/// Discord bot configuration.
///
/// `token`, `channel` and `admins` only seed the settings store; the live
/// values can change at runtime.
#[derive(Clone, Default, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
    /// Target channel id (numeric snowflake).
    #[serde(default)]
    pub channel: String,
    /// Comma-separated `username[=login]` entries.
    #[serde(default)]
    pub admins: String,
    /// Send game text as-is instead of escaping Discord markdown.
    #[serde(default)]
    pub enable_markdown: bool,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &redact(&self.token))
            .field("channel", &self.channel)
            .field("admins", &self.admins)
            .field("enable_markdown", &self.enable_markdown)
            .finish()
    }
}

/// Relay engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Accept chat and commands from the remote channel.
    #[serde(default = "default_true")]
    pub enable_inbound_commands: bool,
    /// Period of the drain loop.
    #[serde(default = "default_drain_interval_ms")]
    pub drain_interval_ms: u64,
    /// Maximum queued messages handled per drain cycle.
    #[serde(default = "default_drain_batch_size")]
    pub drain_batch_size: usize,
    /// Capacity of the inbound command queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Post the online roster after join/leave announcements.
    #[serde(default = "default_true")]
    pub announce_roster: bool,
    /// Override for the supported command list.
    #[serde(default)]
    pub supported_commands: Option<Vec<String>>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enable_inbound_commands: true,
            drain_interval_ms: default_drain_interval_ms(),
            drain_batch_size: default_drain_batch_size(),
            queue_capacity: default_queue_capacity(),
            announce_roster: true,
            supported_commands: None,
        }
    }
}

impl RelayConfig {
    /// Effective supported command list.
    pub fn supported_commands(&self) -> Vec<String> {
        match &self.supported_commands {
            Some(commands) => commands.clone(),
            None => DEFAULT_SUPPORTED_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Outbound message templates.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatsConfig {
    #[serde(default = "default_join_format")]
    pub join: String,
    #[serde(default = "default_leave_format")]
    pub leave: String,
    #[serde(default = "default_chat_format")]
    pub chat: String,
    #[serde(default = "default_server_chat_format")]
    pub server_chat: String,
    #[serde(default = "default_map_start_format")]
    pub map_start: String,
    #[serde(default = "default_notice_format")]
    pub notice: String,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            join: default_join_format(),
            leave: default_leave_format(),
            chat: default_chat_format(),
            server_chat: default_server_chat_format(),
            map_start: default_map_start_format(),
            notice: default_notice_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_drain_interval_ms() -> u64 {
    1000
}

fn default_drain_batch_size() -> usize {
    20
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_join_format() -> String {
    DEFAULT_JOIN_FORMAT.to_string()
}

fn default_leave_format() -> String {
    DEFAULT_LEAVE_FORMAT.to_string()
}

fn default_chat_format() -> String {
    DEFAULT_CHAT_FORMAT.to_string()
}

fn default_server_chat_format() -> String {
    DEFAULT_SERVER_CHAT_FORMAT.to_string()
}

fn default_map_start_format() -> String {
    DEFAULT_MAP_START_FORMAT.to_string()
}

fn default_notice_format() -> String {
    DEFAULT_NOTICE_FORMAT.to_string()
}

/// Mask a secret for logs.
pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
