use super::message::ServerEvent;
use crate::expiry;
use crate::message::{Message, MessageId};
use crate::persistence::MessageLog;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

/// The relay's hub: the authoritative live message set plus the send side
/// of every connected client's channel.
///
/// Keys are assigned here (uuid v4), which makes them unique across all
/// writers. Every mutation re-broadcasts the complete set; clients never
/// see diffs. When a [`MessageLog`] is attached, mutations are mirrored to
/// disk so unexpired messages survive a relay restart.
pub struct Relay {
    messages: HashMap<MessageId, Message>,
    clients: HashMap<String, UnboundedSender<WsMessage>>,
    log: Option<MessageLog>,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            clients: HashMap::new(),
            log: None,
        }
    }

    /// Attach durable storage, seeding the live set with whatever survived
    /// the last shutdown.
    pub fn with_log(log: MessageLog) -> Self {
        let messages = log.load();
        if !messages.is_empty() {
            info!("restored {} live messages from the log", messages.len());
        }
        Self {
            messages,
            clients: HashMap::new(),
            log: Some(log),
        }
    }

    /// Register a connected client and deliver the current full set to it
    /// immediately.
    pub fn register_client(&mut self, id: String, sender: UnboundedSender<WsMessage>) {
        self.send_snapshot_to(&sender);
        self.clients.insert(id, sender);
    }

    pub fn remove_client(&mut self, id: &str) {
        self.clients.remove(id);
    }

    /// Store a new message under a relay-assigned key and fan the updated
    /// set out to everyone. Returns the key.
    pub fn append(&mut self, message: Message) -> MessageId {
        let id = Uuid::new_v4().to_string();
        if let Some(log) = &self.log {
            log.store(&id, &message);
        }
        self.messages.insert(id.clone(), message);
        self.broadcast_snapshot();
        id
    }

    /// Delete a message. Absent keys are a no-op with no broadcast, which
    /// absorbs races between a writer's expiry timer and the sweeper.
    pub fn remove(&mut self, id: &str) {
        if self.messages.remove(id).is_none() {
            debug!("remove of absent key {id}");
            return;
        }
        if let Some(log) = &self.log {
            log.remove(id);
        }
        self.broadcast_snapshot();
    }

    /// Drop every message whose TTL has elapsed, re-deriving expiry from
    /// stored timestamps. This is the server-side guarantee that covers
    /// writers that died before their own deletion timer fired.
    pub fn sweep(&mut self, ttl_secs: u64) {
        let expired = expiry::expired_ids(&self.messages, ttl_secs, Utc::now());
        if expired.is_empty() {
            return;
        }
        info!("sweeping {} expired message(s)", expired.len());
        for id in &expired {
            self.messages.remove(id);
            if let Some(log) = &self.log {
                log.remove(id);
            }
        }
        self.broadcast_snapshot();
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn broadcast_snapshot(&self) {
        let event = ServerEvent::Snapshot {
            messages: self.messages.clone(),
        };
        let text = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize snapshot: {e}");
                return;
            }
        };
        let ws_msg = WsMessage::text(text);
        for (client_id, sender) in &self.clients {
            if sender.send(ws_msg.clone()).is_err() {
                debug!("client {client_id} gone, snapshot dropped");
            }
        }
    }

    fn send_snapshot_to(&self, sender: &UnboundedSender<WsMessage>) {
        let event = ServerEvent::Snapshot {
            messages: self.messages.clone(),
        };
        match serde_json::to_string(&event) {
            Ok(json) => {
                let _ = sender.send(WsMessage::text(json));
            }
            Err(e) => warn!("failed to serialize snapshot: {e}"),
        }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodically sweep expired messages out of the relay. Runs until the
/// process exits.
pub async fn run_sweeper(relay: Arc<Mutex<Relay>>, ttl_secs: u64, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        relay.lock().unwrap().sweep(ttl_secs);
    }
}
