//! Relay orchestrator that ties the game and the remote channel together.
//!
//! Spawns the background tasks (settings reloader, game event relay, remote
//! listener, drain loop) and owns their shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::bridge::channels::ChannelBundle;
use crate::bridge::commands::SupportedCommands;
use crate::bridge::drain::DrainLoop;
use crate::bridge::events::{run_event_loop, EventRelay};
use crate::bridge::listener::RemoteListener;
use crate::bridge::reloader::SettingsReloader;
use crate::bridge::state::{state_channel, StateHandle};
use crate::common::messages::GameEvent;
use crate::common::platform::RemoteConnector;
use crate::config::settings::SettingsStore;
use crate::config::types::Config;
use crate::game::formatter::EventFormatter;
use crate::game::server::GameServer;

/// How long shutdown waits for each background task.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Non-blocking entry point for the host's game event dispatcher.
#[derive(Debug, Clone)]
pub struct GameEventSender {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl GameEventSender {
    /// Hand an event to the relay. Never blocks and never fails; events
    /// sent after shutdown are dropped.
    pub fn send(&self, event: GameEvent) {
        if self.tx.send(event).is_err() {
            debug!("Relay stopped, dropping game event");
        }
    }
}

/// A running relay.
pub struct Relay {
    events: GameEventSender,
    state: StateHandle,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Relay {
    /// Start the relay. Must be called from within a tokio runtime.
    ///
    /// The relay starts inactive and becomes active as soon as the settings
    /// hold both a bot credential and a target channel.
    pub fn spawn(
        config: &Config,
        settings: &SettingsStore,
        game: Arc<dyn GameServer>,
        connector: Arc<dyn RemoteConnector>,
    ) -> Self {
        let relay_config = &config.relay;
        let bundle = ChannelBundle::new(relay_config.queue_capacity);
        let (state_tx, state) = state_channel();
        let shutdown_rx = bundle.control.shutdown_rx;
        let inbound_enabled = relay_config.enable_inbound_commands;

        let mut tasks = Vec::new();

        let inbound_tx = inbound_enabled.then(|| bundle.inbound.inbound_tx.clone());
        let reloader = SettingsReloader::new(connector, inbound_tx, state_tx);
        tasks.push((
            "settings reloader",
            tokio::spawn(reloader.run(settings.subscribe(), shutdown_rx.clone())),
        ));

        let event_relay = EventRelay::new(
            EventFormatter::new(&config.formats),
            Arc::clone(&game),
            relay_config.announce_roster,
        );
        tasks.push((
            "event relay",
            tokio::spawn(run_event_loop(
                event_relay,
                state.clone(),
                bundle.game.events_rx,
                shutdown_rx.clone(),
            )),
        ));

        let listener = RemoteListener::new(state.clone(), bundle.queue.producer, inbound_enabled);
        tasks.push((
            "remote listener",
            tokio::spawn(listener.run(bundle.inbound.inbound_rx, shutdown_rx.clone())),
        ));

        if inbound_enabled {
            let drain = DrainLoop::new(
                bundle.queue.consumer,
                state.clone(),
                game,
                SupportedCommands::from_config(relay_config),
                relay_config.drain_batch_size,
                Duration::from_millis(relay_config.drain_interval_ms),
            );
            tasks.push(("drain loop", tokio::spawn(drain.run(shutdown_rx))));
        } else {
            info!("Inbound commands disabled, relaying game events only");
        }

        Self {
            events: GameEventSender {
                tx: bundle.game.events_tx,
            },
            state,
            shutdown_tx: bundle.control.shutdown_tx,
            tasks,
        }
    }

    /// Sender to register with the game event bus.
    pub fn events(&self) -> GameEventSender {
        self.events.clone()
    }

    pub fn notify(&self, event: GameEvent) {
        self.events.send(event);
    }

    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Stop every background task and the bot client. Undrained queue
    /// entries are discarded.
    pub async fn shutdown(self) {
        info!("Shutting down relay...");
        let _ = self.shutdown_tx.send(true);

        for (name, mut handle) in self.tasks {
            match timeout(SHUTDOWN_TIMEOUT, &mut handle).await {
                Ok(Ok(())) => debug!(task = name, "Task stopped"),
                Ok(Err(e)) => warn!(task = name, "Task failed: {}", e),
                Err(_) => {
                    warn!(task = name, "Task did not stop in time, aborting");
                    handle.abort();
                }
            }
        }
        info!("Relay stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::bridge::testing::{FakeConnector, FakeGame};
    use crate::common::messages::{InboundEvent, InboundMessage};
    use crate::common::types::{MessageRef, Player};
    use crate::config::settings::RelaySettings;

    fn config(enable_inbound_commands: bool) -> Config {
        let mut config = Config::default();
        config.relay.enable_inbound_commands = enable_inbound_commands;
        config.relay.drain_interval_ms = 10;
        config
    }

    fn settings(credential: &str, channel: &str, admins: &str) -> SettingsStore {
        SettingsStore::new(RelaySettings {
            bot_credential: credential.to_string(),
            target_channel_id: channel.to_string(),
            admins: admins.to_string(),
        })
    }

    async fn eventually<F, Fut>(mut condition: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let waited = timeout(Duration::from_secs(5), async {
            while !condition().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "condition not reached in time");
    }

    fn inbound(sender: &str, text: &str) -> InboundEvent {
        InboundEvent::Message(InboundMessage {
            channel_id: "42".to_string(),
            sender_identity: sender.to_string(),
            sender_is_bot: false,
            text: text.to_string(),
            reference: MessageRef {
                channel_id: "42".to_string(),
                message_id: "7".to_string(),
            },
        })
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let game = Arc::new(FakeGame::with_players(vec![Player::new("jdoe", "John")]));
        let connector = Arc::new(FakeConnector::default());
        let store = settings("secret", "42", "alice=jdoe");

        let relay = Relay::spawn(&config(true), &store, game.clone(), connector.clone());
        let state = relay.state();
        eventually(|| {
            let state = state.clone();
            async move { state.is_active() }
        })
        .await;

        relay.notify(GameEvent::PlayerChat {
            player: Player::new("jdoe", "John"),
            text: "hi".to_string(),
            cmd: false,
        });
        let remote = connector.last_remote().unwrap();
        eventually(|| {
            let remote = remote.clone();
            async move { !remote.sent().is_empty() }
        })
        .await;
        assert_eq!(remote.sent_texts(), vec!["[John jdoe] hi"]);

        let inbound_tx = connector.inbound().unwrap();
        inbound_tx.send(inbound("alice", "hello game")).unwrap();
        inbound_tx.send(inbound("alice", "//skip")).unwrap();
        eventually(|| {
            let game = game.clone();
            async move { game.calls() == 2 }
        })
        .await;

        assert_eq!(game.broadcasts(), vec!["[John] hello game"]);
        assert_eq!(game.injections()[0].raw_text, "//skip");
        assert_eq!(remote.deleted().len(), 1);

        relay.shutdown().await;
        assert_eq!(remote.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_inactive_until_channel_set() {
        let game = Arc::new(FakeGame::default());
        let connector = Arc::new(FakeConnector::default());
        let store = settings("secret", "", "");

        let relay = Relay::spawn(&config(true), &store, game, connector.clone());
        relay.notify(GameEvent::Notice("lost".to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!relay.is_active());
        assert!(connector.last_remote().is_none());

        store.set_target_channel("42");
        let state = relay.state();
        eventually(|| {
            let state = state.clone();
            async move { state.is_active() }
        })
        .await;

        relay.notify(GameEvent::Notice("found".to_string()));
        let remote = connector.last_remote().unwrap();
        eventually(|| {
            let remote = remote.clone();
            async move { !remote.sent().is_empty() }
        })
        .await;
        assert_eq!(remote.sent_texts(), vec!["[Event] found"]);

        relay.shutdown().await;
    }

    #[tokio::test]
    async fn test_inbound_disabled_skips_gateway() {
        let connector = Arc::new(FakeConnector::default());
        let store = settings("secret", "42", "alice");

        let relay = Relay::spawn(&config(false), &store, Arc::new(FakeGame::default()), connector.clone());
        let state = relay.state();
        eventually(|| {
            let state = state.clone();
            async move { state.is_active() }
        })
        .await;

        assert!(connector.inbound().is_none());
        assert_eq!(relay.tasks.len(), 3);
        relay.shutdown().await;
    }

    #[tokio::test]
    async fn test_events_after_shutdown_are_dropped() {
        let relay = Relay::spawn(
            &config(true),
            &settings("", "", ""),
            Arc::new(FakeGame::default()),
            Arc::new(FakeConnector::default()),
        );
        let events = relay.events();
        relay.shutdown().await;

        events.send(GameEvent::Notice("late".to_string()));
    }
}
