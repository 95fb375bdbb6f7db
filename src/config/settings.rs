//! Live relay settings.
//!
//! The bot credential, target channel and admin list can change while the
//! relay runs. They live in a `watch` channel; the settings reloader is the
//! subscriber and rebuilds the relay state on every change.

use tokio::sync::watch;

use crate::config::types::{redact, Config};

/// The three runtime-editable settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RelaySettings {
    pub bot_credential: String,
    pub target_channel_id: String,
    /// Comma-separated `identity[=login]` entries.
    pub admins: String,
}

impl std::fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySettings")
            .field("bot_credential", &redact(&self.bot_credential))
            .field("target_channel_id", &self.target_channel_id)
            .field("admins", &self.admins)
            .finish()
    }
}

impl RelaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bot_credential: config.discord.token.trim().to_string(),
            target_channel_id: config.discord.channel.trim().to_string(),
            admins: config.discord.admins.clone(),
        }
    }
}

/// Settings store with change notification.
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<RelaySettings>,
}

impl SettingsStore {
    pub fn new(initial: RelaySettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(RelaySettings::from_config(config))
    }

    /// Current values.
    pub fn current(&self) -> RelaySettings {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every effective change.
    pub fn subscribe(&self) -> watch::Receiver<RelaySettings> {
        self.tx.subscribe()
    }

    /// Returns whether the value changed.
    pub fn set_bot_credential(&self, value: impl Into<String>) -> bool {
        let value = value.into().trim().to_string();
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.bot_credential, value))
    }

    /// Returns whether the value changed.
    pub fn set_target_channel(&self, value: impl Into<String>) -> bool {
        let value = value.into().trim().to_string();
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.target_channel_id, value))
    }

    /// Returns whether the value changed.
    pub fn set_admins(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.admins, value))
    }
}

fn replace_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
