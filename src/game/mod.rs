//! Game side of the relay.
//!
//! This module contains:
//! - The game server capability the relay injects into
//! - Formatting-code stripping for game text
//! - Message formatting with placeholder substitution

pub mod formatter;
pub mod markup;
pub mod server;

// Re-export commonly used types
pub use formatter::EventFormatter;
pub use markup::sanitize;
pub use server::GameServer;
