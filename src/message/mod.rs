//! The `message` module defines the data model shared by every component:
//! the wire-level `Message` record, its payload kind, and the full-set
//! snapshot shape delivered to subscribers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Store-assigned unique key of a message, used as the deletion handle.
pub type MessageId = String;

/// Pseudonymous participant token. Self-issued, unauthenticated, used only
/// to tell "my messages" from others'; collisions are cosmetic.
pub type Token = String;

/// The complete current set of live messages, keyed by store id. Every
/// subscription event carries one of these, never a diff.
pub type Snapshot = HashMap<MessageId, Message>;

/// Payload kind, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
}

/// A single chat message as written to (and read back from) the store.
///
/// The record is immutable after creation; the only state change it ever
/// undergoes is deletion, which is represented by absence from a snapshot
/// rather than a tombstone.
///
/// `content` is either literal text or a self-describing
/// `data:<mime>;base64,...` URI for image and audio payloads. `duration`
/// (seconds of recording) is present if and only if `kind` is audio; the
/// constructors below are the only way this crate builds messages, which
/// keeps that invariant from drifting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub sender: Token,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl Message {
    /// A plain text message stamped with the sender's current wall clock.
    pub fn text(content: impl Into<String>, sender: impl Into<Token>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            sender: sender.into(),
            timestamp: Utc::now(),
            duration: None,
        }
    }

    /// An inline image message. `data_uri` must already be codec output.
    pub fn image(data_uri: impl Into<String>, sender: impl Into<Token>) -> Self {
        Self {
            content: data_uri.into(),
            kind: MessageKind::Image,
            sender: sender.into(),
            timestamp: Utc::now(),
            duration: None,
        }
    }

    /// A voice clip with its recorded length in whole seconds.
    pub fn audio(
        data_uri: impl Into<String>,
        sender: impl Into<Token>,
        duration_secs: u32,
    ) -> Self {
        Self {
            content: data_uri.into(),
            kind: MessageKind::Audio,
            sender: sender.into(),
            timestamp: Utc::now(),
            duration: Some(duration_secs),
        }
    }

    /// The instant this message is due for deletion.
    pub fn expires_at(&self, ttl_secs: u64) -> DateTime<Utc> {
        self.timestamp + Duration::seconds(ttl_secs as i64)
    }

    /// Whether the message has outlived its TTL as of `now`.
    pub fn is_expired(&self, ttl_secs: u64, now: DateTime<Utc>) -> bool {
        self.expires_at(ttl_secs) <= now
    }
}

#[cfg(test)]
mod tests;
