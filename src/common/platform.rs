//! Remote chat platform capability.
//!
//! The relay never talks to a platform library directly. It holds an
//! `Arc<dyn RemoteChat>` built by a `RemoteConnector` whenever the settings
//! change, and reads inbound traffic from the `InboundEvent` stream the
//! connector feeds.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::error::RemoteResult;
use crate::common::messages::InboundEvent;
use crate::common::types::MessageRef;

/// Outbound half of a connected bot client.
#[async_trait]
pub trait RemoteChat: Send + Sync {
    /// Post `text` to `channel_id`.
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        disable_preview: bool,
    ) -> RemoteResult<()>;

    /// Delete a previously received message.
    async fn delete_message(&self, reference: &MessageRef) -> RemoteResult<()>;

    /// Stop any background receive loop owned by this client.
    async fn shutdown(&self) {}
}

/// Builds bot clients from a credential.
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    /// Create a client for `credential`.
    ///
    /// When `inbound` is set, the client must start a receive loop that
    /// pushes every text message (and every receive error) into it until
    /// `RemoteChat::shutdown` is called.
    async fn connect(
        &self,
        credential: &str,
        inbound: Option<mpsc::UnboundedSender<InboundEvent>>,
    ) -> RemoteResult<Arc<dyn RemoteChat>>;
}
