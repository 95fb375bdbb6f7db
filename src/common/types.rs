//! Shared types used across the relay.

/// A player as seen by the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique in-game login.
    pub login: String,
    /// Display name, possibly containing formatting codes.
    pub nickname: String,
}

impl Player {
    pub fn new(login: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            nickname: nickname.into(),
        }
    }
}

/// Map metadata delivered with a map-start event.
///
/// Any field may be missing on the server side; missing values format as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapInfo {
    pub name: Option<String>,
    pub author_login: Option<String>,
    pub author_nickname: Option<String>,
}

/// Reference to a message on the remote platform, used for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: String,
    pub message_id: String,
}
