//! Herald - chat relay between a game server and a Discord channel
//!
//! Forwards game events (joins, leaves, chat, map changes) to a Discord
//! channel and relays messages from allow-listed admins back into the game
//! as chat lines or server commands.
//!
//! The host process owns the game server connection. It implements
//! [`GameServer`], feeds events through [`Relay::events`], and edits the
//! live settings through a [`SettingsStore`].

pub mod bridge;
pub mod common;
pub mod config;
pub mod discord;
pub mod game;

pub use bridge::{GameEventSender, Relay};
pub use common::error::{ConfigError, GameError, RelayError, RemoteError};
pub use common::logging::init_tracing;
pub use common::messages::{GameEvent, InboundEvent, InboundMessage};
pub use common::platform::{RemoteChat, RemoteConnector};
pub use common::types::{MapInfo, MessageRef, Player};
pub use config::{load_and_validate, Config, RelaySettings, SettingsStore};
pub use discord::DiscordConnector;
pub use game::GameServer;
