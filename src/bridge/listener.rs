//! Remote listener: inbound platform messages to the command queue.

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::bridge::queue::QueueProducer;
use crate::bridge::state::StateHandle;
use crate::common::messages::{InboundEvent, InboundMessage, QueuedMessage};

/// Why an inbound message was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    InboundDisabled,
    WrongChannel,
    FromBot,
    NotAdmin,
    QueueFull,
}

pub struct RemoteListener {
    state: StateHandle,
    queue: QueueProducer,
    accept_inbound: bool,
}

impl RemoteListener {
    pub fn new(state: StateHandle, queue: QueueProducer, accept_inbound: bool) -> Self {
        Self {
            state,
            queue,
            accept_inbound,
        }
    }

    /// Filter one message and queue it.
    ///
    /// Plain chat is deleted from the remote channel once queued; command
    /// invocations stay for audit.
    pub async fn handle_message(&self, message: InboundMessage) -> Result<(), Ignored> {
        if !self.accept_inbound {
            return Err(Ignored::InboundDisabled);
        }

        let state = self.state.snapshot();
        if state.channel_id.is_empty() || message.channel_id != state.channel_id {
            debug!(channel_id = %message.channel_id, "Ignoring message from other channel");
            return Err(Ignored::WrongChannel);
        }
        if message.sender_is_bot {
            debug!(sender = %message.sender_identity, "Ignoring bot message");
            return Err(Ignored::FromBot);
        }
        if !state.admins.is_admin(&message.sender_identity) {
            info!(sender = %message.sender_identity, "Ignoring message from non-admin");
            return Err(Ignored::NotAdmin);
        }

        let is_command = message.is_command();
        if !self
            .queue
            .try_push(QueuedMessage::new(&message.sender_identity, &message.text))
        {
            return Err(Ignored::QueueFull);
        }

        if !is_command {
            if let Some(remote) = &state.remote {
                if let Err(e) = remote.delete_message(&message.reference).await {
                    warn!(message_id = %message.reference.message_id, "Failed to delete relayed message: {}", e);
                }
            }
        }
        Ok(())
    }

    pub async fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::Message(message) => {
                let _ = self.handle_message(message).await;
            }
            InboundEvent::Error(message) => {
                error!("Remote receive error: {}", message);
            }
        }
    }

    /// Receive until the stream closes or shutdown is signalled.
    pub async fn run(
        self,
        mut inbound_rx: mpsc::UnboundedReceiver<InboundEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                event = inbound_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            debug!("Inbound channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping remote listener");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bridge::admins::AdminDirectory;
    use crate::bridge::queue::{command_queue, QueueConsumer};
    use crate::bridge::state::{state_channel, RelayState};
    use crate::bridge::testing::SpyRemote;
    use crate::common::types::MessageRef;

    struct Harness {
        listener: RemoteListener,
        queue: QueueConsumer,
        remote: Arc<SpyRemote>,
        _state_tx: watch::Sender<Arc<RelayState>>,
    }

    fn harness(accept_inbound: bool, capacity: usize) -> Harness {
        harness_with(SpyRemote::default(), accept_inbound, capacity)
    }

    fn harness_with(remote: SpyRemote, accept_inbound: bool, capacity: usize) -> Harness {
        let (producer, consumer) = command_queue(capacity);
        let (state_tx, state) = state_channel();
        let remote = Arc::new(remote);
        state_tx.send_replace(Arc::new(RelayState::active(
            "42",
            remote.clone(),
            AdminDirectory::parse("alice=bob123, charlie"),
        )));
        Harness {
            listener: RemoteListener::new(state, producer, accept_inbound),
            queue: consumer,
            remote,
            _state_tx: state_tx,
        }
    }

    fn message(channel_id: &str, sender: &str, text: &str) -> InboundMessage {
        InboundMessage {
            channel_id: channel_id.to_string(),
            sender_identity: sender.to_string(),
            sender_is_bot: false,
            text: text.to_string(),
            reference: MessageRef {
                channel_id: channel_id.to_string(),
                message_id: "1001".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_plain_chat_queued_and_deleted() {
        let mut h = harness(true, 10);

        tokio_test::assert_ok!(h.listener.handle_message(message("42", "alice", "hello")).await);

        assert_eq!(h.queue.try_next(), Some(QueuedMessage::new("alice", "hello")));
        assert_eq!(h.remote.deleted().len(), 1);
        assert_eq!(h.remote.deleted()[0].message_id, "1001");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_message_queued() {
        let mut h = harness_with(SpyRemote::failing(), true, 10);

        tokio_test::assert_ok!(h.listener.handle_message(message("42", "alice", "hello")).await);
        tokio_test::assert_ok!(h.listener.handle_message(message("42", "charlie", "again")).await);

        assert_eq!(h.queue.try_next(), Some(QueuedMessage::new("alice", "hello")));
        assert_eq!(h.queue.try_next(), Some(QueuedMessage::new("charlie", "again")));
        assert!(h.remote.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_command_queued_not_deleted() {
        let mut h = harness(true, 10);

        tokio_test::assert_ok!(h.listener.handle_message(message("42", "charlie", "//skip")).await);

        assert_eq!(h.queue.try_next(), Some(QueuedMessage::new("charlie", "//skip")));
        assert!(h.remote.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_filters() {
        let h = harness(true, 10);

        let result = h.listener.handle_message(message("7", "alice", "hi")).await;
        assert_eq!(result, Err(Ignored::WrongChannel));

        let mut from_bot = message("42", "alice", "hi");
        from_bot.sender_is_bot = true;
        assert_eq!(h.listener.handle_message(from_bot).await, Err(Ignored::FromBot));

        let result = h.listener.handle_message(message("42", "mallory", "hi")).await;
        assert_eq!(result, Err(Ignored::NotAdmin));

        assert!(h.queue.is_empty());
        assert!(h.remote.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_inbound_disabled() {
        let h = harness(false, 10);

        let result = h.listener.handle_message(message("42", "alice", "hi")).await;
        assert_eq!(result, Err(Ignored::InboundDisabled));
        assert!(h.queue.is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_keeps_message() {
        let h = harness(true, 1);

        tokio_test::assert_ok!(h.listener.handle_message(message("42", "alice", "one")).await);
        let result = h.listener.handle_message(message("42", "alice", "two")).await;

        assert_eq!(result, Err(Ignored::QueueFull));
        assert_eq!(h.remote.deleted().len(), 1);
    }

    #[tokio::test]
    async fn test_run_survives_errors() {
        let Harness {
            listener,
            mut queue,
            _state_tx,
            ..
        } = harness(true, 10);
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        inbound_tx.send(InboundEvent::Error("gateway hiccup".to_string())).unwrap();
        inbound_tx
            .send(InboundEvent::Message(message("42", "alice", "after error")))
            .unwrap();
        drop(inbound_tx);

        listener.run(inbound_rx, shutdown_rx).await;

        assert_eq!(queue.try_next(), Some(QueuedMessage::new("alice", "after error")));
    }
}
