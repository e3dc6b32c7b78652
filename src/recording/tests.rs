use super::capture::{AudioCapture, AudioSource, RecordedAudio};
use super::Recorder;
use crate::utils::ChatError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fake microphone for driving the state machine. Counts live acquisitions
/// so exclusivity and release can be asserted.
#[derive(Clone, Default)]
struct FakeSource {
    unavailable: bool,
    fail_finish: bool,
    live: Arc<AtomicUsize>,
    acquired_total: Arc<AtomicUsize>,
}

struct FakeCapture {
    fail_finish: bool,
    live: Arc<AtomicUsize>,
}

impl AudioSource for FakeSource {
    type Capture = FakeCapture;

    fn acquire(&self) -> Result<FakeCapture, ChatError> {
        if self.unavailable {
            return Err(ChatError::CaptureUnavailable("permission denied".into()));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        self.acquired_total.fetch_add(1, Ordering::SeqCst);
        Ok(FakeCapture {
            fail_finish: self.fail_finish,
            live: Arc::clone(&self.live),
        })
    }
}

impl AudioCapture for FakeCapture {
    fn finish(self) -> Result<RecordedAudio, ChatError> {
        if self.fail_finish {
            return Err(ChatError::CaptureUnavailable("device lost mid-session".into()));
        }
        Ok(RecordedAudio {
            bytes: vec![1, 2, 3, 4],
            mime: "audio/webm".to_string(),
        })
    }
}

impl Drop for FakeCapture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeSource {
    fn live_captures(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_produces_audio_payload_with_duration() {
    let source = FakeSource::default();
    let mut recorder = Recorder::new(source.clone());

    recorder.start().unwrap();
    assert!(recorder.is_capturing());

    // Let the ticker task anchor its interval before advancing the clock.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert_eq!(recorder.elapsed_secs(), 5);

    let payload = recorder.stop().unwrap().expect("payload");
    assert_eq!(payload.duration, 5);
    assert!(payload.content.starts_with("data:audio/webm;base64,"));
    assert!(!recorder.is_capturing());
    assert_eq!(source.live_captures(), 0, "microphone not released");
}

#[tokio::test]
async fn test_second_start_is_rejected_without_touching_device() {
    let source = FakeSource::default();
    let mut recorder = Recorder::new(source.clone());

    recorder.start().unwrap();
    assert!(matches!(recorder.start(), Err(ChatError::AlreadyCapturing)));

    // The first session is untouched and still exclusive.
    assert!(recorder.is_capturing());
    assert_eq!(source.acquired_total.load(Ordering::SeqCst), 1);
    assert_eq!(source.live_captures(), 1);
}

#[tokio::test]
async fn test_acquire_failure_reports_and_stays_idle() {
    let source = FakeSource {
        unavailable: true,
        ..FakeSource::default()
    };
    let mut recorder = Recorder::new(source.clone());

    assert!(matches!(
        recorder.start(),
        Err(ChatError::CaptureUnavailable(_))
    ));
    assert!(!recorder.is_capturing());
    assert_eq!(recorder.elapsed_secs(), 0);
}

#[tokio::test]
async fn test_stop_without_start_is_a_noop() {
    let mut recorder = Recorder::new(FakeSource::default());
    assert!(recorder.stop().unwrap().is_none());
}

#[tokio::test]
async fn test_finalize_failure_still_returns_to_idle_and_releases() {
    let source = FakeSource {
        fail_finish: true,
        ..FakeSource::default()
    };
    let mut recorder = Recorder::new(source.clone());

    recorder.start().unwrap();
    assert!(recorder.stop().is_err());

    // Error path: no payload, but resources are gone and the machine is
    // usable again.
    assert!(!recorder.is_capturing());
    assert_eq!(source.live_captures(), 0);
    assert!(recorder.start().is_ok());
}

#[tokio::test]
async fn test_forced_teardown_releases_microphone() {
    let source = FakeSource::default();
    {
        let mut recorder = Recorder::new(source.clone());
        recorder.start().unwrap();
        assert_eq!(source.live_captures(), 1);
    }
    assert_eq!(source.live_captures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_elapsed_resets_between_sessions() {
    let source = FakeSource::default();
    let mut recorder = Recorder::new(source);

    recorder.start().unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    recorder.stop().unwrap();
    assert_eq!(recorder.elapsed_secs(), 0);

    recorder.start().unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(recorder.elapsed_secs(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_one_session_produces_at_most_one_payload() {
    let source = FakeSource::default();
    let mut recorder = Recorder::new(source);

    recorder.start().unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;

    assert!(recorder.stop().unwrap().is_some());
    assert!(recorder.stop().unwrap().is_none(), "second stop produced a payload");
}
