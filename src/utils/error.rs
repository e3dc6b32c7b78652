use thiserror::Error;

/// Errors surfaced by the chat core.
///
/// Every variant is local and recoverable: the worst outcome anywhere in the
/// system is a missing (or not-yet-deleted) message, never corrupted state.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Microphone permission was denied or no capture device exists.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// A media payload exceeds its raw-size ceiling. The write is never
    /// attempted.
    #[error("payload too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// A second recording was started while one is already in progress.
    #[error("a recording is already in progress")]
    AlreadyCapturing,

    /// The backing store rejected or lost an operation. Writes are not
    /// retried; subscriptions reconnect on their own.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}
