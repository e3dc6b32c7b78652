//! The `store` module abstracts the real-time keyed store that holds the
//! live message set.
//!
//! A store assigns keys on append, deletes idempotently, and fans the
//! complete current set out to every subscriber on each change. Two
//! implementations exist: [`MemoryStore`], an in-process hub used by tests
//! and single-process setups, and [`RemoteStore`], a websocket client of
//! the relay server in `transport`.

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::message::{Message, MessageId, Snapshot};
use crate::utils::ChatError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Abstract real-time keyed store.
///
/// Implementations are cheap to clone (handles over shared state) so the
/// expiry scheduler can carry one into its deferred-deletion tasks.
pub trait MessageStore: Clone + Send + Sync + 'static {
    /// Write a new message and return its store-assigned key. The write
    /// becomes visible to every subscriber, the writer included.
    fn append(&self, message: Message)
    -> impl Future<Output = Result<MessageId, ChatError>> + Send;

    /// Delete a message by key. Deleting an absent key is a no-op, which is
    /// what absorbs races between the expiry scheduler and any other
    /// deleter.
    fn remove(&self, id: &MessageId) -> impl Future<Output = Result<(), ChatError>> + Send;

    /// Register a live listener. The current full set is delivered
    /// immediately, then again on every add or remove.
    fn subscribe(&self) -> Subscription;
}

/// The set of live listeners attached to a store, each behind its own
/// unbounded channel so a slow consumer never blocks a write.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<HashMap<String, UnboundedSender<Snapshot>>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener, delivering `current` as its first snapshot.
    pub fn add(&self, current: Snapshot) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(current);

        let key = Uuid::new_v4().to_string();
        self.inner.lock().unwrap().insert(key.clone(), tx);

        let inner = Arc::clone(&self.inner);
        Subscription {
            rx,
            detach: Some(Box::new(move || {
                inner.lock().unwrap().remove(&key);
            })),
        }
    }

    /// Deliver `snapshot` to every attached listener. Listeners whose
    /// receiving side is gone are skipped; they detach on drop.
    pub fn broadcast(&self, snapshot: &Snapshot) {
        let subs = self.inner.lock().unwrap();
        for tx in subs.values() {
            let _ = tx.send(snapshot.clone());
        }
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Live listener handle. Snapshots arrive via [`Subscription::recv`];
/// dropping the handle (or calling [`Subscription::unsubscribe`]) detaches
/// the listener deterministically.
pub struct Subscription {
    rx: UnboundedReceiver<Snapshot>,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// The next full-set snapshot, or `None` once detached and drained.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// A snapshot that is already queued, if any. Test convenience.
    pub fn try_recv(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    /// Detach the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
