//! Discord bot client.
//!
//! Implements the remote chat capability on top of serenity: sends and
//! deletes go through the HTTP client, inbound messages come from a gateway
//! task that rebuilds itself with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::{Http, HttpBuilder};
use serenity::model::channel::MessageFlags;
use serenity::model::id::{ChannelId, MessageId};
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::bridge::delivery::MAX_MESSAGE_LENGTH;
use crate::common::error::{RemoteError, RemoteResult};
use crate::common::messages::InboundEvent;
use crate::common::platform::{RemoteChat, RemoteConnector};
use crate::common::types::MessageRef;
use crate::config::types::DiscordConfig;
use crate::discord::escape::MarkdownEscaper;
use crate::discord::handler::GatewayEvents;

/// How long shutdown waits for the gateway to close.
const GATEWAY_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for the gateway reconnect delay.
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(5 * 60);

/// Builds Discord clients from a bot token.
#[derive(Debug, Clone, Default)]
pub struct DiscordConnector {
    enable_markdown: bool,
}

impl DiscordConnector {
    pub fn new(enable_markdown: bool) -> Self {
        Self { enable_markdown }
    }

    pub fn from_config(config: &DiscordConfig) -> Self {
        Self::new(config.enable_markdown)
    }
}

#[async_trait]
impl RemoteConnector for DiscordConnector {
    async fn connect(
        &self,
        credential: &str,
        inbound: Option<mpsc::UnboundedSender<InboundEvent>>,
    ) -> RemoteResult<Arc<dyn RemoteChat>> {
        let http = build_http(credential).map_err(|e| RemoteError::ConnectFailed {
            message: e.to_string(),
        })?;
        let user = http.get_current_user().await?;
        info!("Discord bot authenticated as {}", user.name);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let gateway = inbound.map(|inbound_tx| {
            tokio::spawn(run_gateway(credential.to_string(), inbound_tx, shutdown_rx))
        });

        Ok(Arc::new(DiscordChat {
            http: Arc::new(http),
            escaper: MarkdownEscaper::new(self.enable_markdown),
            shutdown_tx,
            gateway: Mutex::new(gateway),
        }))
    }
}

/// A connected Discord bot.
pub struct DiscordChat {
    http: Arc<Http>,
    escaper: MarkdownEscaper,
    shutdown_tx: watch::Sender<bool>,
    gateway: Mutex<Option<JoinHandle<()>>>,
}

#[async_trait]
impl RemoteChat for DiscordChat {
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        disable_preview: bool,
    ) -> RemoteResult<()> {
        let channel = parse_channel_id(channel_id)?;
        for chunk in self.escaper.escape_chunks(text, MAX_MESSAGE_LENGTH) {
            let mut builder = CreateMessage::new().content(chunk);
            if disable_preview {
                builder = builder.flags(MessageFlags::SUPPRESS_EMBEDS);
            }
            channel.send_message(&self.http, builder).await?;
        }
        Ok(())
    }

    async fn delete_message(&self, reference: &MessageRef) -> RemoteResult<()> {
        let channel = parse_channel_id(&reference.channel_id)?;
        let message = parse_message_id(&reference.message_id)?;
        channel.delete_message(&self.http, message).await?;
        Ok(())
    }

    async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let Some(mut handle) = self.gateway.lock().await.take() else {
            return;
        };
        if timeout(GATEWAY_SHUTDOWN_TIMEOUT, &mut handle).await.is_err() {
            warn!("Discord gateway did not stop in time, aborting");
            handle.abort();
        }
    }
}

/// Parse a snowflake channel id.
pub fn parse_channel_id(channel_id: &str) -> RemoteResult<ChannelId> {
    parse_snowflake(channel_id)
        .map(ChannelId::new)
        .ok_or_else(|| RemoteError::InvalidChannel {
            channel_id: channel_id.to_string(),
        })
}

/// Parse a snowflake message id.
pub fn parse_message_id(message_id: &str) -> RemoteResult<MessageId> {
    parse_snowflake(message_id)
        .map(MessageId::new)
        .ok_or_else(|| RemoteError::InvalidMessage {
            message_id: message_id.to_string(),
        })
}

fn parse_snowflake(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

fn build_http(token: &str) -> anyhow::Result<Http> {
    // Build a custom reqwest client with timeout settings
    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    Ok(HttpBuilder::new(token).client(reqwest_client).build())
}

async fn build_client(
    token: &str,
    inbound_tx: mpsc::UnboundedSender<InboundEvent>,
) -> anyhow::Result<Client> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let http = build_http(token)?;
    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(GatewayEvents::new(inbound_tx))
        .await?;
    Ok(client)
}

/// Exponential backoff for gateway reconnection.
/// 5s initial, 5min max, factor 1.1, with jitter, unlimited retries.
fn gateway_backoff() -> impl Iterator<Item = Duration> {
    use backon::BackoffBuilder;

    backon::ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(5))
        .with_max_delay(MAX_RECONNECT_DELAY)
        .with_factor(1.1)
        .with_jitter()
        .without_max_times()
        .build()
}

/// Resolves once shutdown is requested or the client is dropped.
async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Describe why `Client::start` returned. A clean return still counts as a
/// lost connection and goes through the reconnect path.
fn disconnect_reason(result: &serenity::Result<()>) -> String {
    match result {
        Ok(()) => "Discord gateway closed".to_string(),
        Err(e) => format!("Discord gateway error: {}", e),
    }
}

async fn run_gateway(
    token: String,
    inbound_tx: mpsc::UnboundedSender<InboundEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut backoff = gateway_backoff();

    loop {
        info!("Connecting to Discord gateway...");

        let failure = match build_client(&token, inbound_tx.clone()).await {
            Ok(mut client) => {
                backoff = gateway_backoff();
                let shard_manager = client.shard_manager.clone();

                tokio::select! {
                    result = client.start() => {
                        let reason = disconnect_reason(&result);
                        if result.is_ok() {
                            warn!("{}", reason);
                        } else {
                            error!("{}", reason);
                        }
                        reason
                    }
                    _ = shutdown_requested(&mut shutdown_rx) => {
                        info!("Initiating graceful Discord shutdown...");
                        shard_manager.shutdown_all().await;
                        info!("Discord shutdown complete");
                        break;
                    }
                }
            }
            Err(e) => {
                let reason = format!("Failed to build Discord client: {}", e);
                error!("{}", reason);
                reason
            }
        };

        if inbound_tx.send(InboundEvent::Error(failure)).is_err() {
            debug!("Relay stopped listening, ending gateway task");
            break;
        }

        let delay = backoff.next().unwrap_or(MAX_RECONNECT_DELAY);
        warn!("Reconnecting to Discord in {:.1}s...", delay.as_secs_f64());
        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown_requested(&mut shutdown_rx) => break,
        }
    }
    debug!("Discord gateway task ended");
}
