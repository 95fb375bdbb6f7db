//! Drain loop: inbound queue to game injection.
//!
//! Runs on a fixed cadence and handles at most `batch_size` queued messages
//! per cycle. Every per-message failure is logged and the cycle moves on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::bridge::commands::{SupportedCommands, UNSUPPORTED_COMMAND_NOTICE};
use crate::bridge::delivery::deliver;
use crate::bridge::queue::QueueConsumer;
use crate::bridge::state::{RelayState, StateHandle};
use crate::common::error::{GameError, RelayResult};
use crate::common::messages::QueuedMessage;
use crate::game::server::GameServer;

/// Attribution for plain chat from an admin without an online bound player.
const GENERIC_ADMIN_LABEL: &str = "Admin";

/// What happened to one queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Command injected as the bound player.
    Injected,
    /// Plain text broadcast to the game chat.
    Broadcast,
    /// Unknown command, notice sent back to the remote channel.
    Unsupported,
    /// Sender has no bound player, or the player is offline.
    Dropped,
}

pub struct DrainLoop {
    queue: QueueConsumer,
    state: StateHandle,
    game: Arc<dyn GameServer>,
    commands: SupportedCommands,
    batch_size: usize,
    period: Duration,
}

impl DrainLoop {
    pub fn new(
        queue: QueueConsumer,
        state: StateHandle,
        game: Arc<dyn GameServer>,
        commands: SupportedCommands,
        batch_size: usize,
        period: Duration,
    ) -> Self {
        Self {
            queue,
            state,
            game,
            commands,
            batch_size: batch_size.max(1),
            period,
        }
    }

    /// Messages still waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!(pending = self.queue.len(), "Shutdown signal received, stopping drain loop");
                        break;
                    }
                }
            }
        }
    }

    /// One drain cycle. Returns how many messages were taken off the queue.
    ///
    /// Messages stay queued while the relay is inactive.
    pub async fn run_cycle(&mut self) -> usize {
        let state = self.state.snapshot();
        if !state.is_active() {
            return 0;
        }

        let mut handled = 0;
        while handled < self.batch_size {
            let Some(message) = self.queue.try_next() else {
                break;
            };
            handled += 1;

            match self.process(&state, &message).await {
                Ok(outcome) => debug!(sender = %message.sender_identity, ?outcome, "Drained message"),
                Err(e) => warn!(sender = %message.sender_identity, "Failed to relay message to game: {}", e),
            }
        }
        handled
    }

    async fn process(&self, state: &RelayState, message: &QueuedMessage) -> RelayResult<DrainOutcome> {
        if message.is_command() {
            self.process_command(state, message).await
        } else {
            self.process_chat(state, message).await
        }
    }

    async fn process_command(
        &self,
        state: &RelayState,
        message: &QueuedMessage,
    ) -> RelayResult<DrainOutcome> {
        if !self.commands.contains(message.command_name()) {
            deliver(state, UNSUPPORTED_COMMAND_NOTICE).await;
            return Ok(DrainOutcome::Unsupported);
        }

        let Some(login) = state.admins.resolve_login(&message.sender_identity) else {
            debug!(sender = %message.sender_identity, "Admin has no bound player, dropping command");
            return Ok(DrainOutcome::Dropped);
        };
        let Some(player) = self.game.lookup_player(login).await else {
            return Err(GameError::PlayerOffline {
                login: login.to_string(),
            }
            .into());
        };

        info!(login, command = message.command_name(), "Remote -> game command");
        self.game
            .inject_command(&player, &message.raw_text, true)
            .await?;
        Ok(DrainOutcome::Injected)
    }

    async fn process_chat(
        &self,
        state: &RelayState,
        message: &QueuedMessage,
    ) -> RelayResult<DrainOutcome> {
        let player = match state.admins.resolve_login(&message.sender_identity) {
            Some(login) => self.game.lookup_player(login).await,
            None => None,
        };
        let label = player
            .as_ref()
            .map(|p| p.nickname.as_str())
            .unwrap_or(GENERIC_ADMIN_LABEL);

        let line = format!("[{}] {}", label, message.raw_text);
        debug!("Remote -> game: {}", line);
        self.game.broadcast_chat(&line).await?;
        Ok(DrainOutcome::Broadcast)
    }
}
