//! Message formatting for display.
//!
//! Handles placeholder substitution in message format strings and turns
//! game events into the lines posted to the remote channel.
//! Supports placeholders: %time, %user, %message, %map, %author

use chrono::Local;

use crate::common::types::{MapInfo, Player};
use crate::config::types::FormatsConfig;
use crate::game::markup::sanitize;

/// Default format for a player joining.
pub const DEFAULT_JOIN_FORMAT: &str = "[%user] joined the server.";

/// Default format for a player leaving.
pub const DEFAULT_LEAVE_FORMAT: &str = "[%user] left the server.";

/// Default format for player chat.
pub const DEFAULT_CHAT_FORMAT: &str = "[%user] %message";

/// Default format for lines written by the server.
pub const DEFAULT_SERVER_CHAT_FORMAT: &str = "%message";

/// Default format for a map change.
pub const DEFAULT_MAP_START_FORMAT: &str = "New Map: %map by %author";

/// Default format for host announcements.
pub const DEFAULT_NOTICE_FORMAT: &str = "[Event] %message";

/// Server chat lines that duplicate connect/disconnect events.
pub const SUPPRESSED_SERVER_LINES: [&str; 2] = ["joined the server!", "left the server!"];

/// Roster text when nobody is online.
pub const EMPTY_ROSTER: &str = "No players online";

/// Header of the roster listing.
pub const ROSTER_HEADER: &str = "Currently online:";

const PLACEHOLDERS: [&str; 5] = ["time", "user", "message", "map", "author"];

/// Message formatter that substitutes placeholders in format strings.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    /// Format string for this formatter.
    format: String,
}

impl MessageFormatter {
    /// Create a new formatter with the given format string.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Format a message with the given context.
    ///
    /// Substitution is single-pass, so placeholder-like text inside the
    /// substituted values is left alone.
    pub fn format(&self, ctx: &FormatContext) -> String {
        let mut result = String::with_capacity(self.format.len() + ctx.message.len());
        let mut rest = self.format.as_str();

        while let Some(pos) = rest.find('%') {
            result.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            match PLACEHOLDERS.iter().find(|name| after.starts_with(*name)) {
                Some(name) => {
                    result.push_str(&ctx.value(name));
                    rest = &after[name.len()..];
                }
                None => {
                    result.push('%');
                    rest = after;
                }
            }
        }
        result.push_str(rest);
        result
    }
}

/// Context for message formatting.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    /// Player label ("nickname login").
    pub user: String,
    /// The message content.
    pub message: String,
    /// Map name.
    pub map: String,
    /// Map author label ("nickname login").
    pub author: String,
}

impl FormatContext {
    /// Create a new format context.
    pub fn new(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the map name.
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = map.into();
        self
    }

    /// Set the map author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    fn value(&self, placeholder: &str) -> String {
        match placeholder {
            "time" => get_time(),
            "user" => self.user.clone(),
            "message" => self.message.clone(),
            "map" => self.map.clone(),
            "author" => self.author.clone(),
            _ => String::new(),
        }
    }
}

/// Get the current time as HH:MM:SS string.
fn get_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Formats game events into remote channel messages.
#[derive(Debug, Clone)]
pub struct EventFormatter {
    join: MessageFormatter,
    leave: MessageFormatter,
    chat: MessageFormatter,
    server_chat: MessageFormatter,
    map_start: MessageFormatter,
    notice: MessageFormatter,
}

impl Default for EventFormatter {
    fn default() -> Self {
        Self::new(&FormatsConfig::default())
    }
}

impl EventFormatter {
    pub fn new(formats: &FormatsConfig) -> Self {
        Self {
            join: MessageFormatter::new(&formats.join),
            leave: MessageFormatter::new(&formats.leave),
            chat: MessageFormatter::new(&formats.chat),
            server_chat: MessageFormatter::new(&formats.server_chat),
            map_start: MessageFormatter::new(&formats.map_start),
            notice: MessageFormatter::new(&formats.notice),
        }
    }

    pub fn player_joined(&self, player: &Player) -> String {
        self.join.format(&FormatContext::new(player_label(player), ""))
    }

    pub fn player_left(&self, player: &Player) -> String {
        self.leave.format(&FormatContext::new(player_label(player), ""))
    }

    pub fn player_chat(&self, player: &Player, text: &str) -> String {
        self.chat
            .format(&FormatContext::new(player_label(player), sanitize(text)))
    }

    /// Returns `None` for join/leave announcements, which the connect and
    /// disconnect events already cover.
    pub fn server_chat(&self, text: &str) -> Option<String> {
        let text = sanitize(text);
        if SUPPRESSED_SERVER_LINES.iter().any(|line| text.contains(line)) {
            return None;
        }
        Some(self.server_chat.format(&FormatContext::new("", text)))
    }

    pub fn map_started(&self, map: &MapInfo) -> String {
        let name = sanitize(map.name.as_deref().unwrap_or(""));
        let author_login = sanitize(map.author_login.as_deref().unwrap_or(""));
        let author_nick = sanitize(map.author_nickname.as_deref().unwrap_or(""));
        let ctx = FormatContext::new("", "")
            .with_map(name)
            .with_author(format!("{} {}", author_nick, author_login));
        self.map_start.format(&ctx)
    }

    pub fn notice(&self, text: &str) -> String {
        self.notice.format(&FormatContext::new("", sanitize(text)))
    }

    /// List online players by sanitized nickname, one per line.
    pub fn roster(&self, players: &[Player]) -> String {
        if players.is_empty() {
            return EMPTY_ROSTER.to_string();
        }
        let mut message = String::from(ROSTER_HEADER);
        for player in players {
            message.push('\n');
            message.push_str(&sanitize(&player.nickname));
        }
        message
    }
}

/// "nickname login" label used in join/leave/chat lines.
fn player_label(player: &Player) -> String {
    format!("{} {}", sanitize(&player.nickname), player.login)
}

/// Find the last UTF-8 char boundary at or before `byte_index` in `s`.
///
/// Returns a byte offset that is safe to use for slicing `s`.
fn floor_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index >= s.len() {
        return s.len();
    }
    let mut i = byte_index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Split a message into chunks that fit within the max length (in bytes).
///
/// Prefers line breaks, then spaces. Never splits in the middle of a
/// multi-byte UTF-8 character.
pub fn split_message(message: &str, max_len: usize) -> Vec<String> {
    if message.len() <= max_len {
        return vec![message.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = message;

    while !remaining.is_empty() {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            break;
        }

        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let split_at = floor_char_boundary(remaining, max_len);

        // max_len smaller than the first character: force one character.
        if split_at == 0 {
            let first_char_end = remaining
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(remaining.len());
            chunks.push(remaining[..first_char_end].to_string());
            remaining = &remaining[first_char_end..];
            continue;
        }

        let chunk = &remaining[..split_at];

        if let Some(break_idx) = chunk.rfind('\n').or_else(|| chunk.rfind(' ')) {
            if break_idx > 0 {
                chunks.push(remaining[..break_idx].to_string());
                remaining = &remaining[break_idx + 1..];
                continue;
            }
        }
        chunks.push(chunk.to_string());
        remaining = &remaining[split_at..];
    }

    chunks
}
