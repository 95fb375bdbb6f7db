//! Game event relay: game events in, formatted messages out.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::bridge::delivery::deliver;
use crate::bridge::state::{RelayState, StateHandle};
use crate::common::messages::GameEvent;
use crate::game::formatter::EventFormatter;
use crate::game::server::GameServer;

/// Formats game events and hands them to outbound delivery.
pub struct EventRelay {
    formatter: EventFormatter,
    game: Arc<dyn GameServer>,
    announce_roster: bool,
}

impl EventRelay {
    pub fn new(formatter: EventFormatter, game: Arc<dyn GameServer>, announce_roster: bool) -> Self {
        Self {
            formatter,
            game,
            announce_roster,
        }
    }

    /// Relay one event using `state`. Returns the number of messages sent.
    pub async fn handle(&self, state: &RelayState, event: GameEvent) -> usize {
        if !state.is_active() {
            return 0;
        }

        let mut messages = Vec::with_capacity(2);
        match event {
            GameEvent::PlayerConnect(player) => {
                messages.push(self.formatter.player_joined(&player));
                if self.announce_roster {
                    messages.push(self.roster().await);
                }
            }
            GameEvent::PlayerDisconnect(player) => {
                messages.push(self.formatter.player_left(&player));
                if self.announce_roster {
                    messages.push(self.roster().await);
                }
            }
            GameEvent::PlayerChat { player, text, .. } => {
                messages.push(self.formatter.player_chat(&player, &text));
            }
            GameEvent::ServerChat { text, .. } => match self.formatter.server_chat(&text) {
                Some(message) => messages.push(message),
                None => debug!("Suppressed server join/leave line"),
            },
            GameEvent::MapStart(map) => {
                messages.push(self.formatter.map_started(&map));
            }
            GameEvent::Notice(text) => {
                messages.push(self.formatter.notice(&text));
            }
        }

        let mut sent = 0;
        for message in messages {
            debug!("Game -> remote: {}", message);
            sent += deliver(state, &message).await;
        }
        sent
    }

    async fn roster(&self) -> String {
        let players = self.game.list_online_players().await;
        self.formatter.roster(&players)
    }
}

/// Relay game events until the channel closes or shutdown is signalled.
pub async fn run_event_loop(
    relay: EventRelay,
    state: StateHandle,
    mut events_rx: mpsc::UnboundedReceiver<GameEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = events_rx.recv() => {
                match event {
                    Some(event) => {
                        let snapshot = state.snapshot();
                        relay.handle(&snapshot, event).await;
                    }
                    None => {
                        debug!("Game event channel closed");
                        break;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("Shutdown signal received, stopping event relay");
                    break;
                }
            }
        }
    }
}
