use super::{Message, MessageKind};
use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_text_message_has_no_duration() {
    let msg = Message::text("hi", "user1");
    assert_eq!(msg.kind, MessageKind::Text);
    assert_eq!(msg.content, "hi");
    assert!(msg.duration.is_none());
}

#[test]
fn test_audio_message_carries_duration() {
    let msg = Message::audio("data:audio/webm;base64,AAAA", "user1", 5);
    assert_eq!(msg.kind, MessageKind::Audio);
    assert_eq!(msg.duration, Some(5));
}

#[test]
fn test_wire_shape() {
    let mut msg = Message::text("hello", "abc123");
    msg.timestamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["content"], "hello");
    assert_eq!(json["type"], "text");
    assert_eq!(json["sender"], "abc123");
    // ISO-8601 timestamp string.
    assert!(json["timestamp"].as_str().unwrap().starts_with("2025-01-02T03:04:05"));
    // duration is omitted entirely for non-audio messages.
    assert!(json.get("duration").is_none());
}

#[test]
fn test_wire_roundtrip_audio() {
    let msg = Message::audio("data:audio/webm;base64,AAAA", "u", 12);
    let json = serde_json::to_string(&msg).unwrap();
    let parsed: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, msg);
}

#[test]
fn test_expiry_boundary() {
    let msg = Message::text("hi", "u");
    let just_before = msg.timestamp + Duration::seconds(59);
    let at_deadline = msg.timestamp + Duration::seconds(60);

    assert!(!msg.is_expired(60, just_before));
    assert!(msg.is_expired(60, at_deadline));
}
