//! Error types for the relay.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    IoError { path: String, message: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors raised by the remote chat platform adapter.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Failed to connect to remote platform: {message}")]
    ConnectFailed { message: String },

    #[error("Invalid channel id: {channel_id}")]
    InvalidChannel { channel_id: String },

    #[error("Invalid message reference: {message_id}")]
    InvalidMessage { message_id: String },

    #[error("Failed to send message: {message}")]
    SendFailed { message: String },

    #[error("Failed to delete message: {message}")]
    DeleteFailed { message: String },

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Errors raised by the game server when injecting chat or commands.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Player '{login}' is not online")]
    PlayerOffline { login: String },

    #[error("Game server rejected the request: {message}")]
    Rejected { message: String },
}

/// Failure while relaying a single message in either direction.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Result type alias for remote platform operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Result type alias for game server operations.
pub type GameResult<T> = std::result::Result<T, GameError>;

/// Result type alias for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
