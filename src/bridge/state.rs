//! Relay state snapshots.
//!
//! The settings reloader is the only writer. It builds a complete
//! `RelayState` and swaps it in through a `watch` channel; every reader takes
//! one `Arc` snapshot at the start of an operation and works from that, so
//! nobody ever sees a client without a channel or a half-built admin list.

use std::sync::Arc;

use tokio::sync::watch;

use crate::bridge::admins::AdminDirectory;
use crate::common::platform::RemoteChat;

/// Everything a relay operation needs, captured at one point in time.
#[derive(Clone, Default)]
pub struct RelayState {
    /// Target channel on the remote platform. Empty while inactive.
    pub channel_id: String,
    /// Connected bot client. `None` while inactive.
    pub remote: Option<Arc<dyn RemoteChat>>,
    pub admins: AdminDirectory,
    active: bool,
}

impl std::fmt::Debug for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayState")
            .field("channel_id", &self.channel_id)
            .field("remote", &self.remote.is_some())
            .field("admins", &self.admins.len())
            .field("active", &self.active)
            .finish()
    }
}

impl RelayState {
    /// Passive state: every producer path is a no-op.
    pub fn inactive(admins: AdminDirectory) -> Self {
        Self {
            channel_id: String::new(),
            remote: None,
            admins,
            active: false,
        }
    }

    /// Live state bound to a client and channel.
    pub fn active(
        channel_id: impl Into<String>,
        remote: Arc<dyn RemoteChat>,
        admins: AdminDirectory,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            remote: Some(remote),
            admins,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Client and channel, only when active.
    pub fn target(&self) -> Option<(&dyn RemoteChat, &str)> {
        match (&self.remote, self.active) {
            (Some(remote), true) => Some((remote.as_ref(), self.channel_id.as_str())),
            _ => None,
        }
    }
}

/// Read side of the state channel.
#[derive(Debug, Clone)]
pub struct StateHandle {
    rx: watch::Receiver<Arc<RelayState>>,
}

impl StateHandle {
    pub fn new(rx: watch::Receiver<Arc<RelayState>>) -> Self {
        Self { rx }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Arc<RelayState> {
        Arc::clone(&self.rx.borrow())
    }

    pub fn is_active(&self) -> bool {
        self.rx.borrow().is_active()
    }

    /// Wait for the next published state.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Create the state channel, starting inactive.
pub fn state_channel() -> (watch::Sender<Arc<RelayState>>, StateHandle) {
    let (tx, rx) = watch::channel(Arc::new(RelayState::default()));
    (tx, StateHandle::new(rx))
}
