//! Canonical message types for relay communication.
//!
//! This module defines the single source of truth for the values that cross
//! task boundaries: game events going out, remote messages coming in, and the
//! queue entries handed from the listener to the drain loop.

use crate::common::types::{MapInfo, MessageRef, Player};

/// Prefix that marks an inbound remote message as a command.
pub const COMMAND_PREFIX: char = '/';

/// Event emitted by the game server's event bus.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A player joined the server.
    PlayerConnect(Player),
    /// A player left the server.
    PlayerDisconnect(Player),
    /// A player wrote in the game chat.
    PlayerChat {
        player: Player,
        text: String,
        /// Whether the game parsed the line as a chat command.
        cmd: bool,
    },
    /// A line written by the server itself.
    ServerChat { text: String, cmd: bool },
    /// A new map started.
    MapStart(MapInfo),
    /// Free-form announcement from the host.
    Notice(String),
}

/// Message received from the remote platform.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: String,
    pub sender_identity: String,
    pub sender_is_bot: bool,
    pub text: String,
    pub reference: MessageRef,
}

impl InboundMessage {
    /// Whether the text is a command invocation rather than a chat relay.
    pub fn is_command(&self) -> bool {
        self.text.starts_with(COMMAND_PREFIX)
    }
}

/// Item of the remote receive stream.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A text message arrived.
    Message(InboundMessage),
    /// The receive loop hit an error; it keeps running.
    Error(String),
}

/// Entry of the inbound command queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub sender_identity: String,
    pub raw_text: String,
}

impl QueuedMessage {
    pub fn new(sender_identity: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            sender_identity: sender_identity.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Whether the text is a command invocation rather than a chat relay.
    pub fn is_command(&self) -> bool {
        self.raw_text.starts_with(COMMAND_PREFIX)
    }

    /// First whitespace-delimited token of the text.
    pub fn command_name(&self) -> &str {
        self.raw_text.split_whitespace().next().unwrap_or("")
    }
}
