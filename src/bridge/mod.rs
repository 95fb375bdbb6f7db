//! Relay engine between the game server and the remote chat channel.
//!
//! ## Module Structure
//!
//! - `admins`: Admin directory parsed from the admin setting
//! - `channels`: Communication channel structures
//! - `commands`: Supported inbound command set
//! - `delivery`: Fire-and-forget outbound sends
//! - `drain`: Periodic queue drain into the game
//! - `events`: Game event formatting and relay
//! - `listener`: Remote message filtering and queueing
//! - `orchestrator`: Task wiring and shutdown (`Relay` struct)
//! - `queue`: Bounded inbound command queue
//! - `reloader`: Settings reload into fresh relay state
//! - `state`: Copy-on-write relay state snapshots

pub mod admins;
pub mod channels;
pub mod commands;
pub mod delivery;
pub mod drain;
pub mod events;
pub mod listener;
pub mod orchestrator;
pub mod queue;
pub mod reloader;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use admins::{AdminDirectory, AdminEntry};
pub use commands::SupportedCommands;
pub use orchestrator::{GameEventSender, Relay};
pub use state::{RelayState, StateHandle};
