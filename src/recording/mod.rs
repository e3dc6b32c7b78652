//! The `recording` module governs the microphone capture lifecycle: a two
//! state machine (`Idle` / `Capturing`) that owns the exclusive capture
//! resource, counts elapsed seconds while recording, and finalizes the
//! accumulated audio into a transport payload on stop.
//!
//! Resource release is structural, not best-effort: the capture handle and
//! the ticker task live inside the `Capturing` state value, so leaving the
//! state by any path (stop, finalization error, dropping the recorder)
//! releases the microphone and silences the timer.

pub mod capture;

pub use capture::{AudioCapture, AudioSource, RecordedAudio};

use crate::codec;
use crate::utils::ChatError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Finished voice clip, ready to wrap in an audio message.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    /// `data:audio/...;base64,...` URI produced by the codec.
    pub content: String,
    /// Recorded length in whole seconds, as shown to the user while
    /// capturing.
    pub duration: u32,
}

enum State<C> {
    Idle,
    Capturing { capture: C, ticker: Ticker },
}

/// Recording state machine. One per client; must live on a tokio runtime
/// (the elapsed-seconds ticker is a spawned task).
pub struct Recorder<S: AudioSource> {
    source: S,
    state: State<S::Capture>,
}

impl<S: AudioSource> Recorder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: State::Idle,
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, State::Capturing { .. })
    }

    /// Seconds elapsed in the current capture, `0` when idle. The UI polls
    /// this for the live timer readout.
    pub fn elapsed_secs(&self) -> u64 {
        match &self.state {
            State::Idle => 0,
            State::Capturing { ticker, .. } => ticker.elapsed_secs(),
        }
    }

    /// Acquire the microphone and begin capturing.
    ///
    /// A second `start` while capturing is refused with
    /// [`ChatError::AlreadyCapturing`] before any resource is touched, so
    /// the running session is never disturbed. Acquisition failure leaves
    /// the recorder `Idle`.
    pub fn start(&mut self) -> Result<(), ChatError> {
        if self.is_capturing() {
            return Err(ChatError::AlreadyCapturing);
        }
        let capture = self.source.acquire()?;
        self.state = State::Capturing {
            capture,
            ticker: Ticker::start(),
        };
        Ok(())
    }

    /// Stop capturing and finalize the recording into a payload.
    ///
    /// Returns `Ok(None)` when nothing was being recorded (a stop with no
    /// matching start is harmless). On a finalization or encoding failure
    /// the error is surfaced and no payload is produced, but the recorder
    /// is `Idle` either way: the state is taken out before finalization, so
    /// the microphone and ticker are released on every path.
    pub fn stop(&mut self) -> Result<Option<AudioPayload>, ChatError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Ok(None),
            State::Capturing { capture, ticker } => {
                let duration = ticker.elapsed_secs() as u32;
                drop(ticker);
                let recorded = capture.finish()?;
                let content = codec::encode_audio(&recorded.bytes, &recorded.mime)?;
                Ok(Some(AudioPayload { content, duration }))
            }
        }
    }
}

/// One-second ticker backing the elapsed readout. Aborts its task on drop
/// so no timer outlives the capture that started it.
struct Ticker {
    elapsed: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn start() -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&elapsed);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        Self { elapsed, handle }
    }

    fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests;
