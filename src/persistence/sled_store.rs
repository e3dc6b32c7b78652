use crate::message::{Message, Snapshot};
use crate::utils::ChatError;
use chrono::Utc;
use sled::Db;
use std::path::Path;
use tracing::warn;

/// Durable message log backing the relay's in-memory set.
#[derive(Clone)]
pub struct MessageLog {
    db: Db,
    ttl_seconds: u64,
}

impl MessageLog {
    pub fn open(path: impl AsRef<Path>, ttl_seconds: u64) -> Result<Self, ChatError> {
        let db = sled::open(path)
            .map_err(|e| ChatError::StoreUnavailable(format!("failed to open message log: {e}")))?;
        Ok(Self { db, ttl_seconds })
    }

    /// Persist a message under its store key. Best-effort: failures are
    /// logged, the in-memory set stays correct.
    pub fn store(&self, id: &str, message: &Message) {
        let serialized = match serde_json::to_vec(message) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to serialize message {id}: {e}");
                return;
            }
        };
        if let Err(e) = self.db.insert(id.as_bytes(), serialized) {
            warn!("failed to persist message {id}: {e}");
        }
    }

    /// Drop a message from the log. Removing an absent key is a no-op.
    pub fn remove(&self, id: &str) {
        if let Err(e) = self.db.remove(id.as_bytes()) {
            warn!("failed to remove message {id}: {e}");
        }
    }

    /// Load every live message, sweeping out entries whose TTL elapsed
    /// while the relay was down.
    pub fn load(&self) -> Snapshot {
        let now = Utc::now();
        let mut live = Snapshot::new();
        let mut dead: Vec<sled::IVec> = Vec::new();

        for entry in self.db.iter() {
            let (key, value) = match entry {
                Ok(kv) => kv,
                Err(e) => {
                    warn!("message log read error: {e}");
                    continue;
                }
            };
            let id = match std::str::from_utf8(&key) {
                Ok(id) => id.to_string(),
                Err(_) => {
                    dead.push(key);
                    continue;
                }
            };
            match serde_json::from_slice::<Message>(&value) {
                Ok(msg) if msg.is_expired(self.ttl_seconds, now) => dead.push(key),
                Ok(msg) => {
                    live.insert(id, msg);
                }
                Err(e) => {
                    warn!("dropping undecodable message {id}: {e}");
                    dead.push(key);
                }
            }
        }

        for key in dead {
            let _ = self.db.remove(key);
        }
        live
    }
}

impl std::fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLog")
            .field("db", &"sled::Db")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
