//! Discord bot integration.
//!
//! This module provides the Discord implementation of the remote chat
//! capability used by the relay.

pub mod client;
pub mod escape;
pub mod handler;

// Re-export main types for external use
pub use client::{DiscordChat, DiscordConnector};
