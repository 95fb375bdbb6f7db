//! Relay channel management.
//!
//! Groups the channels connecting the host, the remote client and the
//! relay's background tasks.

use tokio::sync::{mpsc, watch};

use crate::bridge::queue::{command_queue, QueueConsumer, QueueProducer};
use crate::common::messages::{GameEvent, InboundEvent};

/// Game event hand-off: the host sends, the event relay receives.
pub struct GameEventChannels {
    pub events_tx: mpsc::UnboundedSender<GameEvent>,
    pub events_rx: mpsc::UnboundedReceiver<GameEvent>,
}

/// Remote receive stream: clients send, the listener receives.
pub struct InboundChannels {
    pub inbound_tx: mpsc::UnboundedSender<InboundEvent>,
    pub inbound_rx: mpsc::UnboundedReceiver<InboundEvent>,
}

/// Inbound command queue between listener and drain loop.
pub struct QueueChannels {
    pub producer: QueueProducer,
    pub consumer: QueueConsumer,
}

/// Control channels for shutdown coordination.
pub struct ControlChannels {
    pub shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Bundle of all channels created for one relay.
pub struct ChannelBundle {
    pub game: GameEventChannels,
    pub inbound: InboundChannels,
    pub queue: QueueChannels,
    pub control: ControlChannels,
}

impl ChannelBundle {
    pub fn new(queue_capacity: usize) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (producer, consumer) = command_queue(queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            game: GameEventChannels {
                events_tx,
                events_rx,
            },
            inbound: InboundChannels {
                inbound_tx,
                inbound_rx,
            },
            queue: QueueChannels { producer, consumer },
            control: ControlChannels {
                shutdown_tx,
                shutdown_rx,
            },
        }
    }
}
