//! Discord gateway event handling.
//!
//! Forwards every guild text message to the relay as an `InboundEvent`.
//! Filtering by channel, bot flag and admin list happens in the listener.

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::common::messages::{InboundEvent, InboundMessage};
use crate::common::types::MessageRef;

pub struct GatewayEvents {
    inbound_tx: mpsc::UnboundedSender<InboundEvent>,
}

impl GatewayEvents {
    pub fn new(inbound_tx: mpsc::UnboundedSender<InboundEvent>) -> Self {
        Self { inbound_tx }
    }
}

#[async_trait]
impl EventHandler for GatewayEvents {
    async fn ready(&self, _context: Context, ready: Ready) {
        info!("Discord gateway connected as {}", ready.user.name);
    }

    async fn message(&self, _context: Context, message: Message) {
        if let Err(error) = self.inbound_tx.send(InboundEvent::Message(to_inbound(&message))) {
            warn!("Failed to forward discord message: {}", error);
        }
    }
}

/// Map a Discord message onto the platform-neutral inbound message.
pub fn to_inbound(message: &Message) -> InboundMessage {
    let channel_id = message.channel_id.to_string();
    InboundMessage {
        reference: MessageRef {
            channel_id: channel_id.clone(),
            message_id: message.id.to_string(),
        },
        channel_id,
        sender_identity: message.author.name.clone(),
        sender_is_bot: message.author.bot,
        text: message.content.clone(),
    }
}
