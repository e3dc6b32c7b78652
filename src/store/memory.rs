use super::{MessageStore, Subscribers, Subscription};
use crate::message::{Message, MessageId, Snapshot};
use crate::utils::ChatError;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-process message store.
///
/// Serialization of individual writes and deletes comes from the single
/// mutex around the message map; subscribers receive the full set after
/// every mutation. Clones share state, so any clone can be handed to the
/// expiry scheduler.
#[derive(Clone, Default)]
pub struct MemoryStore {
    messages: Arc<Mutex<Snapshot>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live messages. Test convenience.
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageStore for MemoryStore {
    async fn append(&self, message: Message) -> Result<MessageId, ChatError> {
        let id = Uuid::new_v4().to_string();
        let snapshot = {
            let mut messages = self.messages.lock().unwrap();
            messages.insert(id.clone(), message);
            messages.clone()
        };
        self.subscribers.broadcast(&snapshot);
        Ok(id)
    }

    async fn remove(&self, id: &MessageId) -> Result<(), ChatError> {
        let snapshot = {
            let mut messages = self.messages.lock().unwrap();
            if messages.remove(id).is_none() {
                // Already gone: idempotent no-op, nothing to announce.
                return Ok(());
            }
            messages.clone()
        };
        self.subscribers.broadcast(&snapshot);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.subscribers.add(self.messages.lock().unwrap().clone())
    }
}
