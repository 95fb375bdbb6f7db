//! Inbound command queue.
//!
//! Bounded FIFO between the remote listener (producer) and the drain loop
//! (consumer). Both sides are non-blocking: a full queue drops the new
//! message and an empty queue ends the drain cycle.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::common::messages::QueuedMessage;

/// Create a queue holding at most `capacity` messages.
pub fn command_queue(capacity: usize) -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Listener side of the queue.
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: mpsc::Sender<QueuedMessage>,
}

impl QueueProducer {
    /// Enqueue without waiting. Returns `false` if the message was dropped.
    pub fn try_push(&self, message: QueuedMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                warn!(
                    sender = %message.sender_identity,
                    "Inbound queue full, dropping message"
                );
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Drain loop side of the queue.
#[derive(Debug)]
pub struct QueueConsumer {
    rx: mpsc::Receiver<QueuedMessage>,
}

impl QueueConsumer {
    /// Next message in arrival order, if any.
    pub fn try_next(&mut self) -> Option<QueuedMessage> {
        self.rx.try_recv().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
