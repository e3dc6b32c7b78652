use crate::utils::ChatError;

/// A finalized recording: the accumulated samples as one binary blob, plus
/// the container mime the codec should stamp on the data URI.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Provider of the exclusive microphone resource.
///
/// The recorder never touches a device directly; it goes through this seam
/// so the state machine can be driven in tests (and so platform capture
/// backends stay out of the core). Acquisition failure (permission denied,
/// no device) surfaces as [`ChatError::CaptureUnavailable`].
pub trait AudioSource: Send + Sync + 'static {
    type Capture: AudioCapture;

    fn acquire(&self) -> Result<Self::Capture, ChatError>;
}

/// A live capture session holding the microphone.
///
/// Implementations accumulate samples internally from acquisition until
/// [`AudioCapture::finish`] consumes the session. The device must be
/// released when the session is dropped, whatever the path out: `finish`,
/// an error, or abrupt teardown of the owner.
pub trait AudioCapture: Send + 'static {
    /// Stop capturing and hand back everything accumulated so far. The
    /// device is released even when finalization fails.
    fn finish(self) -> Result<RecordedAudio, ChatError>;
}
