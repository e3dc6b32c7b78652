use crate::message::{Message, MessageId, Snapshot};
use serde::{Deserialize, Serialize};

/// Requests a chat client sends to the relay.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientRequest {
    /// Write a new message; the relay assigns the key and answers with
    /// [`ServerEvent::Appended`].
    Append { message: Message },

    /// Delete a message by key. No reply; deleting an absent key is a
    /// no-op.
    Remove { id: MessageId },
}

/// Events the relay pushes to connected clients.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// The complete current message set. Sent once on connect and again
    /// after every mutation; never a diff.
    Snapshot { messages: Snapshot },

    /// Ack for this client's own `append`, carrying the assigned key.
    /// Acks arrive in request order.
    Appended { id: MessageId },
}
