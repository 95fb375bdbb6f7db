//! Game server capability consumed by the relay.

use async_trait::async_trait;

use crate::common::error::GameResult;
use crate::common::types::Player;

/// Chat and command injection into the running game server.
#[async_trait]
pub trait GameServer: Send + Sync {
    /// Feed `raw_text` to the command dispatcher as if `player` typed it.
    async fn inject_command(&self, player: &Player, raw_text: &str, privileged: bool)
        -> GameResult<()>;

    /// Write a line to the public game chat.
    async fn broadcast_chat(&self, text: &str) -> GameResult<()>;

    /// Find an online player by login.
    async fn lookup_player(&self, login: &str) -> Option<Player>;

    /// Players currently on the server.
    async fn list_online_players(&self) -> Vec<Player>;
}
