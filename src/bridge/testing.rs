//! In-memory collaborators for relay tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::error::{GameError, GameResult, RemoteError, RemoteResult};
use crate::common::messages::InboundEvent;
use crate::common::platform::{RemoteChat, RemoteConnector};
use crate::common::types::{MessageRef, Player};
use crate::game::server::GameServer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub text: String,
    pub disable_preview: bool,
}

/// Remote client that records every call.
#[derive(Debug, Default)]
pub struct SpyRemote {
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<MessageRef>>,
    send_attempts: AtomicUsize,
    shutdowns: AtomicUsize,
    fail: bool,
}

impl SpyRemote {
    /// A client whose sends and deletes always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteChat for SpyRemote {
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        disable_preview: bool,
    ) -> RemoteResult<()> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RemoteError::SendFailed {
                message: "spy configured to fail".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            disable_preview,
        });
        Ok(())
    }

    async fn delete_message(&self, reference: &MessageRef) -> RemoteResult<()> {
        if self.fail {
            return Err(RemoteError::DeleteFailed {
                message: "spy configured to fail".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(reference.clone());
        Ok(())
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub login: String,
    pub raw_text: String,
    pub privileged: bool,
}

/// Game server with a fixed set of online players.
#[derive(Debug, Default)]
pub struct FakeGame {
    online: Mutex<Vec<Player>>,
    injections: Mutex<Vec<Injection>>,
    broadcasts: Mutex<Vec<String>>,
    reject_commands: AtomicBool,
}

impl FakeGame {
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            online: Mutex::new(players),
            ..Default::default()
        }
    }

    pub fn reject_commands(&self) {
        self.reject_commands.store(true, Ordering::SeqCst);
    }

    pub fn injections(&self) -> Vec<Injection> {
        self.injections.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.broadcasts.lock().unwrap().clone()
    }

    /// Injections plus broadcasts.
    pub fn calls(&self) -> usize {
        self.injections.lock().unwrap().len() + self.broadcasts.lock().unwrap().len()
    }
}

#[async_trait]
impl GameServer for FakeGame {
    async fn inject_command(
        &self,
        player: &Player,
        raw_text: &str,
        privileged: bool,
    ) -> GameResult<()> {
        if self.reject_commands.load(Ordering::SeqCst) {
            return Err(GameError::Rejected {
                message: "command dispatcher offline".to_string(),
            });
        }
        self.injections.lock().unwrap().push(Injection {
            login: player.login.clone(),
            raw_text: raw_text.to_string(),
            privileged,
        });
        Ok(())
    }

    async fn broadcast_chat(&self, text: &str) -> GameResult<()> {
        self.broadcasts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn lookup_player(&self, login: &str) -> Option<Player> {
        self.online
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.login == login)
            .cloned()
    }

    async fn list_online_players(&self) -> Vec<Player> {
        self.online.lock().unwrap().clone()
    }
}

/// Connector handing out `SpyRemote` clients.
#[derive(Debug, Default)]
pub struct FakeConnector {
    credentials: Mutex<Vec<String>>,
    remotes: Mutex<Vec<Arc<SpyRemote>>>,
    inbound: Mutex<Option<mpsc::UnboundedSender<InboundEvent>>>,
    fail: AtomicBool,
}

impl FakeConnector {
    pub fn fail_connects(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Credentials passed to every successful connect, in order.
    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }

    /// Most recently created client.
    pub fn last_remote(&self) -> Option<Arc<SpyRemote>> {
        self.remotes.lock().unwrap().last().cloned()
    }

    pub fn remotes(&self) -> Vec<Arc<SpyRemote>> {
        self.remotes.lock().unwrap().clone()
    }

    /// Inbound sender handed to the last connect.
    pub fn inbound(&self) -> Option<mpsc::UnboundedSender<InboundEvent>> {
        self.inbound.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteConnector for FakeConnector {
    async fn connect(
        &self,
        credential: &str,
        inbound: Option<mpsc::UnboundedSender<InboundEvent>>,
    ) -> RemoteResult<Arc<dyn RemoteChat>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RemoteError::ConnectFailed {
                message: "invalid credential".to_string(),
            });
        }
        let remote = Arc::new(SpyRemote::default());
        self.credentials.lock().unwrap().push(credential.to_string());
        self.remotes.lock().unwrap().push(Arc::clone(&remote));
        *self.inbound.lock().unwrap() = inbound;
        Ok(remote)
    }
}
