use super::Chat;
use crate::codec::IMAGE_MAX_BYTES;
use crate::identity::Identity;
use crate::message::MessageKind;
use crate::recording::{AudioCapture, AudioSource, RecordedAudio};
use crate::store::{MemoryStore, MessageStore};
use crate::utils::ChatError;
use std::time::Duration;

#[derive(Clone, Default)]
struct StubSource;

struct StubCapture;

impl AudioSource for StubSource {
    type Capture = StubCapture;

    fn acquire(&self) -> Result<StubCapture, ChatError> {
        Ok(StubCapture)
    }
}

impl AudioCapture for StubCapture {
    fn finish(self) -> Result<RecordedAudio, ChatError> {
        Ok(RecordedAudio {
            bytes: vec![0xAB; 64],
            mime: "audio/webm".to_string(),
        })
    }
}

fn chat_over(store: MemoryStore) -> Chat<MemoryStore, StubSource> {
    Chat::new(store, Identity::ephemeral(), StubSource)
}

#[tokio::test]
async fn test_send_text_is_visible_to_all_subscribers() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());

    let mut sub_a = store.subscribe();
    let mut sub_b = store.subscribe();
    sub_a.recv().await.unwrap();
    sub_b.recv().await.unwrap();

    let id = chat.send_text("hi").await.unwrap().expect("message id");

    for sub in [&mut sub_a, &mut sub_b] {
        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot[&id].content, "hi");
        assert_eq!(snapshot[&id].kind, MessageKind::Text);
    }
}

#[tokio::test(start_paused = true)]
async fn test_sent_message_expires_after_ttl() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());

    chat.send_text("hi").await.unwrap();
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_secs(59)).await;
    tokio::task::yield_now().await;
    assert_eq!(store.len(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_whitespace_only_text_is_not_sent() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());

    assert!(chat.send_text("   \n ").await.unwrap().is_none());
    assert_eq!(store.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_record_five_seconds_sends_audio_with_duration() {
    let store = MemoryStore::new();
    let mut chat = chat_over(store.clone());

    chat.start_recording().unwrap();
    assert!(chat.is_recording());

    // Let the ticker task anchor its interval before advancing the clock.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert_eq!(chat.recording_secs(), 5);

    let id = chat.stop_recording().await.unwrap().expect("message id");
    assert!(!chat.is_recording());

    let snapshot = store.subscribe().try_recv().unwrap();
    let msg = &snapshot[&id];
    assert_eq!(msg.kind, MessageKind::Audio);
    assert_eq!(msg.duration, Some(5));
    assert!(msg.content.starts_with("data:audio/webm;base64,"));
}

#[tokio::test]
async fn test_oversized_image_is_rejected_with_notice_and_no_write() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());

    let bytes = vec![0u8; IMAGE_MAX_BYTES + 1];
    let result = chat.send_image(&bytes, "image/png").await;

    assert!(matches!(result, Err(ChatError::TooLarge { .. })));
    assert_eq!(store.len(), 0);
    assert!(chat.notices().current().is_some());
}

#[tokio::test]
async fn test_image_within_limit_is_sent() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());

    let id = chat.send_image(&[1, 2, 3], "image/png").await.unwrap();
    let snapshot = store.subscribe().try_recv().unwrap();
    assert_eq!(snapshot[&id].kind, MessageKind::Image);
    assert!(snapshot[&id].content.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_is_mine_distinguishes_authorship() {
    let store = MemoryStore::new();
    let chat = chat_over(store.clone());
    let other = chat_over(store.clone());

    let id = chat.send_text("mine").await.unwrap().unwrap();
    let snapshot = store.subscribe().try_recv().unwrap();

    assert!(chat.is_mine(&snapshot[&id]));
    assert!(!other.is_mine(&snapshot[&id]));
}

#[tokio::test]
async fn test_stop_without_recording_sends_nothing() {
    let store = MemoryStore::new();
    let mut chat = chat_over(store.clone());

    assert!(chat.stop_recording().await.unwrap().is_none());
    assert_eq!(store.len(), 0);
}
