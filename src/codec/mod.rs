//! The `codec` module converts raw media bytes into the inline transport
//! representation embedded in a message's `content` field: a
//! `data:<mime>;base64,<payload>` URI.
//!
//! Size ceilings are enforced on the raw bytes before any encoding work is
//! done, so an oversized payload never costs an allocation and never reaches
//! the store. Decoding on the display side is the identity function: the
//! transport representation is the display representation.

use crate::utils::ChatError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Hard ceiling on raw image bytes: 2 MiB.
pub const IMAGE_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Ceiling on raw audio bytes: 8 MiB. Comfortably above what a one-minute
/// voice clip produces, while still bounding a runaway recording.
pub const AUDIO_MAX_BYTES: usize = 8 * 1024 * 1024;

/// Encode an image for inline transport. Fails with [`ChatError::TooLarge`]
/// when the raw bytes exceed [`IMAGE_MAX_BYTES`].
pub fn encode_image(bytes: &[u8], mime: &str) -> Result<String, ChatError> {
    encode_with_limit(bytes, mime, IMAGE_MAX_BYTES)
}

/// Encode a recorded audio clip for inline transport. Fails with
/// [`ChatError::TooLarge`] when the raw bytes exceed [`AUDIO_MAX_BYTES`].
pub fn encode_audio(bytes: &[u8], mime: &str) -> Result<String, ChatError> {
    encode_with_limit(bytes, mime, AUDIO_MAX_BYTES)
}

fn encode_with_limit(bytes: &[u8], mime: &str, limit: usize) -> Result<String, ChatError> {
    if bytes.len() > limit {
        return Err(ChatError::TooLarge {
            size: bytes.len(),
            limit,
        });
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
