//! Settings reloader.
//!
//! Reacts to settings changes by publishing a fresh `RelayState`. The relay
//! goes inactive first, then comes back with a client, channel and admin
//! list that were all built from the same settings.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::bridge::admins::AdminDirectory;
use crate::bridge::state::RelayState;
use crate::common::messages::InboundEvent;
use crate::common::platform::{RemoteChat, RemoteConnector};
use crate::config::settings::RelaySettings;

/// A client together with the credential it was built from.
struct Session {
    credential: String,
    remote: Arc<dyn RemoteChat>,
}

pub struct SettingsReloader {
    connector: Arc<dyn RemoteConnector>,
    /// Handed to every new client; `None` when inbound commands are disabled.
    inbound_tx: Option<mpsc::UnboundedSender<InboundEvent>>,
    state_tx: watch::Sender<Arc<RelayState>>,
    session: Option<Session>,
}

impl SettingsReloader {
    pub fn new(
        connector: Arc<dyn RemoteConnector>,
        inbound_tx: Option<mpsc::UnboundedSender<InboundEvent>>,
        state_tx: watch::Sender<Arc<RelayState>>,
    ) -> Self {
        Self {
            connector,
            inbound_tx,
            state_tx,
            session: None,
        }
    }

    /// Rebuild the relay state from `settings`. Returns whether it is active.
    pub async fn reload(&mut self, settings: &RelaySettings) -> bool {
        // Producers stop before anything is rebuilt.
        let previous_admins = self.state_tx.borrow().admins.clone();
        self.state_tx
            .send_replace(Arc::new(RelayState::inactive(previous_admins)));

        let admins = AdminDirectory::parse(&settings.admins);
        let credential = settings.bot_credential.trim();
        let channel_id = settings.target_channel_id.trim();

        if credential.is_empty() || channel_id.is_empty() {
            if credential.is_empty() {
                self.close_session().await;
            }
            info!(
                has_credential = !credential.is_empty(),
                has_channel = !channel_id.is_empty(),
                admins = admins.len(),
                "Relay settings incomplete, staying inactive"
            );
            self.state_tx
                .send_replace(Arc::new(RelayState::inactive(admins)));
            return false;
        }

        let remote = match self.session_for(credential).await {
            Some(remote) => remote,
            None => {
                self.state_tx
                    .send_replace(Arc::new(RelayState::inactive(admins)));
                return false;
            }
        };

        info!(channel_id, admins = admins.len(), "Relay active");
        self.state_tx
            .send_replace(Arc::new(RelayState::active(channel_id, remote, admins)));
        true
    }

    /// Reuse the current client if the credential is unchanged, otherwise
    /// replace it.
    async fn session_for(&mut self, credential: &str) -> Option<Arc<dyn RemoteChat>> {
        if let Some(session) = &self.session {
            if session.credential == credential {
                debug!("Bot credential unchanged, reusing client");
                return Some(Arc::clone(&session.remote));
            }
        }

        self.close_session().await;
        match self.connector.connect(credential, self.inbound_tx.clone()).await {
            Ok(remote) => {
                self.session = Some(Session {
                    credential: credential.to_string(),
                    remote: Arc::clone(&remote),
                });
                Some(remote)
            }
            Err(e) => {
                error!("Failed to connect bot client: {}", e);
                None
            }
        }
    }

    async fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Shutting down previous bot client");
            session.remote.shutdown().await;
        }
    }

    /// Reload once with the current settings, then on every change.
    pub async fn run(
        mut self,
        mut settings_rx: watch::Receiver<RelaySettings>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let initial = settings_rx.borrow_and_update().clone();
        self.reload(&initial).await;

        loop {
            tokio::select! {
                changed = settings_rx.changed() => {
                    if changed.is_err() {
                        debug!("Settings store dropped");
                        break;
                    }
                    let settings = settings_rx.borrow_and_update().clone();
                    info!("Relay settings changed, reloading");
                    self.reload(&settings).await;
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping settings reloader");
                        break;
                    }
                }
            }
        }

        self.state_tx
            .send_replace(Arc::new(RelayState::inactive(AdminDirectory::default())));
        self.close_session().await;
    }
}
