//! The `view` module projects store snapshots into the ordered sequence the
//! rendering layer displays.
//!
//! The projection is a pure function of the latest snapshot: it holds no
//! state of its own and re-sorts the full set on every event. Network
//! delivery order is untrusted (writes from different participants may
//! arrive interleaved), so ordering always comes from the messages' own
//! timestamps. A message that was present in an earlier snapshot and is
//! absent now has simply been deleted; it drops out of the projection with
//! no further signal.

use crate::message::{Message, MessageId, Snapshot};

/// Sort a snapshot ascending by timestamp. Equal timestamps are broken by
/// id so repeated projections of the same set are byte-for-byte identical,
/// keeping re-renders stable.
pub fn order(snapshot: &Snapshot) -> Vec<(MessageId, Message)> {
    let mut ordered: Vec<(MessageId, Message)> = snapshot
        .iter()
        .map(|(id, msg)| (id.clone(), msg.clone()))
        .collect();
    ordered.sort_by(|(a_id, a), (b_id, b)| {
        a.timestamp.cmp(&b.timestamp).then_with(|| a_id.cmp(b_id))
    });
    ordered
}
