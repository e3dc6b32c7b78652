//! The `chat` module is the composition root of the client: it wires the
//! identity provider, payload codec, recording state machine, store adapter
//! and expiry scheduler into the operations a composing UI calls.
//!
//! Every successful write immediately schedules its own deletion, so a
//! message's lifetime is sealed the moment it is sent.

use crate::codec;
use crate::expiry::{self, MESSAGE_TTL};
use crate::identity::Identity;
use crate::message::{Message, MessageId};
use crate::recording::{AudioSource, Recorder};
use crate::store::{MessageStore, Subscription};
use crate::utils::{ChatError, Notices};
use std::time::Duration;
use tracing::info;

/// A participant's handle on the ephemeral channel.
pub struct Chat<S: MessageStore, A: AudioSource> {
    store: S,
    identity: Identity,
    recorder: Recorder<A>,
    notices: Notices,
    ttl: Duration,
}

impl<S: MessageStore, A: AudioSource> Chat<S, A> {
    pub fn new(store: S, identity: Identity, source: A) -> Self {
        Self {
            store,
            identity,
            recorder: Recorder::new(source),
            notices: Notices::new(),
            ttl: MESSAGE_TTL,
        }
    }

    /// Override the message lifetime. Tests shorten it; production keeps
    /// [`MESSAGE_TTL`].
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn token(&self) -> &str {
        self.identity.token()
    }

    /// Whether `message` was authored by this participant.
    pub fn is_mine(&self, message: &Message) -> bool {
        message.sender == *self.identity.token()
    }

    /// Transient notices for the rendering layer (size limit, microphone
    /// trouble). Auto-dismissing; read-only for the consumer.
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Live view of the channel. Feed each snapshot through
    /// [`crate::view::order`] for display.
    pub fn subscribe(&self) -> Subscription {
        self.store.subscribe()
    }

    /// Send a text message. Whitespace-only input is silently skipped and
    /// reported as `Ok(None)`.
    pub async fn send_text(&self, text: &str) -> Result<Option<MessageId>, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let id = self
            .write(Message::text(trimmed, self.identity.token().clone()))
            .await?;
        Ok(Some(id))
    }

    /// Encode and send an image. Oversized images are rejected before any
    /// write and announced via a transient notice.
    pub async fn send_image(&self, bytes: &[u8], mime: &str) -> Result<MessageId, ChatError> {
        let content = match codec::encode_image(bytes, mime) {
            Ok(content) => content,
            Err(e) => {
                if matches!(e, ChatError::TooLarge { .. }) {
                    self.notices.post("Please select an image under 2 MiB");
                }
                return Err(e);
            }
        };
        self.write(Message::image(content, self.identity.token().clone()))
            .await
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_capturing()
    }

    /// Seconds recorded so far, for the live timer readout.
    pub fn recording_secs(&self) -> u64 {
        self.recorder.elapsed_secs()
    }

    /// Begin a voice recording. Microphone trouble is announced via a
    /// transient notice and leaves the recorder idle.
    pub fn start_recording(&mut self) -> Result<(), ChatError> {
        match self.recorder.start() {
            Ok(()) => Ok(()),
            Err(e) => {
                if matches!(e, ChatError::CaptureUnavailable(_)) {
                    self.notices.post("Microphone unavailable");
                }
                Err(e)
            }
        }
    }

    /// Stop recording and send the clip as an audio message carrying its
    /// duration. `Ok(None)` when no recording was in progress. On failure
    /// nothing is written, but the recorder is idle again either way.
    pub async fn stop_recording(&mut self) -> Result<Option<MessageId>, ChatError> {
        let payload = match self.recorder.stop()? {
            Some(payload) => payload,
            None => return Ok(None),
        };
        let message = Message::audio(
            payload.content,
            self.identity.token().clone(),
            payload.duration,
        );
        let id = self.write(message).await?;
        Ok(Some(id))
    }

    async fn write(&self, message: Message) -> Result<MessageId, ChatError> {
        let kind = message.kind;
        let id = self.store.append(message).await?;
        // Fire-and-forget: the deletion timer outlives this handle.
        let _ = expiry::schedule_removal(self.store.clone(), id.clone(), self.ttl);
        info!("sent {kind:?} message {id}, expires in {:?}", self.ttl);
        Ok(id)
    }
}

#[cfg(test)]
mod tests;
