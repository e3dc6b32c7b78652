//! The `expiry` module enforces the message TTL.
//!
//! Policy: whoever writes a message schedules its own deletion with a local
//! deferred timer keyed to the write moment. The timer fires exactly once
//! per write and issues an idempotent `remove`, so a race with any other
//! deleter (a second timer, the relay sweeper) collapses into a no-op. If
//! the writing process dies before its timer fires, the relay's periodic
//! sweep picks the orphan up by scanning stored timestamps.

use crate::message::{MessageId, Snapshot};
use crate::store::MessageStore;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Fixed message lifetime: 60 seconds from write time.
pub const MESSAGE_TTL: Duration = Duration::from_secs(60);

/// Schedule the deletion of `id` after `ttl`. Fire-and-forget: the task
/// keeps its own clone of the store and does not retry on failure, since
/// the redundant server-side sweep covers the loss.
pub fn schedule_removal<S: MessageStore>(
    store: S,
    id: MessageId,
    ttl: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        match store.remove(&id).await {
            Ok(()) => debug!("expired message {id}"),
            Err(e) => warn!("expiry removal of {id} failed: {e}"),
        }
    })
}

/// Keys of all messages in `snapshot` that have outlived `ttl_secs` as of
/// `now`. Used by the relay's sweeper to re-derive expiry from stored
/// timestamps, independent of any client's liveness.
pub fn expired_ids(snapshot: &Snapshot, ttl_secs: u64, now: DateTime<Utc>) -> Vec<MessageId> {
    snapshot
        .iter()
        .filter(|(_, msg)| msg.is_expired(ttl_secs, now))
        .map(|(id, _)| id.clone())
        .collect()
}
