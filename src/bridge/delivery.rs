//! Outbound delivery to the remote channel.
//!
//! Fire-and-forget: failures are logged and dropped, never retried and
//! never returned to the caller.

use tracing::{debug, warn};

use crate::bridge::state::RelayState;
use crate::game::formatter::split_message;

/// Longest message the remote platform accepts.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Send `text` to the target channel of `state`.
///
/// Does nothing when the state is inactive. Returns the number of chunks
/// that were accepted by the remote side.
pub async fn deliver(state: &RelayState, text: &str) -> usize {
    let Some((remote, channel_id)) = state.target() else {
        return 0;
    };
    if text.trim().is_empty() {
        debug!("Skipping empty outbound message");
        return 0;
    }

    let mut sent = 0;
    for chunk in split_message(text, MAX_MESSAGE_LENGTH) {
        match remote.send_message(channel_id, &chunk, true).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(channel_id, "Failed to deliver message: {}", e),
        }
    }
    sent
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bridge::admins::AdminDirectory;
    use crate::bridge::testing::SpyRemote;

    #[tokio::test]
    async fn test_inactive_sends_nothing() {
        assert_eq!(deliver(&RelayState::default(), "hello").await, 0);
    }

    #[tokio::test]
    async fn test_sends_with_preview_disabled() {
        let remote = Arc::new(SpyRemote::default());
        let state = RelayState::active("42", remote.clone(), AdminDirectory::default());

        assert_eq!(deliver(&state, "hello").await, 1);

        let sent = remote.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel_id, "42");
        assert_eq!(sent[0].text, "hello");
        assert!(sent[0].disable_preview);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let remote = Arc::new(SpyRemote::failing());
        let state = RelayState::active("42", remote.clone(), AdminDirectory::default());

        assert_eq!(deliver(&state, "hello").await, 0);
        assert_eq!(remote.send_attempts(), 1);
    }

    #[tokio::test]
    async fn test_long_message_is_split() {
        let remote = Arc::new(SpyRemote::default());
        let state = RelayState::active("42", remote.clone(), AdminDirectory::default());
        let line = "x".repeat(1500);

        assert_eq!(deliver(&state, &format!("{}\n{}", line, line)).await, 2);
        assert!(remote.sent().iter().all(|m| m.text.len() <= MAX_MESSAGE_LENGTH));
    }
}
