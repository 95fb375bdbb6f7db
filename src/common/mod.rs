//! Common utilities and types shared across the application.

pub mod error;
pub mod logging;
pub mod messages;
pub mod platform;
pub mod types;

// Re-export message types from messages module
pub use messages::{GameEvent, InboundEvent, InboundMessage, QueuedMessage};
pub use types::{MapInfo, MessageRef, Player};
