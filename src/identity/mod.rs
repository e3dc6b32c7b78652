//! The `identity` module issues the pseudonymous participant token used to
//! tag outgoing messages.
//!
//! The token is generated once per device, persisted in a small sled
//! database, and reused for every later session. Nothing verifies it:
//! authorship tagging is cosmetic by design, so a collision between two
//! participants is tolerated. The whole operation is best-effort with no
//! network dependency; if the device store cannot be opened the provider
//! silently degrades to a fresh in-memory token for this session.

use crate::message::Token;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

const TOKEN_KEY: &[u8] = b"participant_token";

/// Device-scoped identity provider. Construct once per process; the token
/// it hands out is stable for the provider's lifetime.
#[derive(Debug, Clone)]
pub struct Identity {
    token: Token,
}

impl Identity {
    /// Load the device token from `path`, creating and persisting one on
    /// first use. Never fails: storage trouble is logged and answered with
    /// an ephemeral token instead.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            token: get_or_create_token(path.as_ref()),
        }
    }

    /// An identity that skips device storage entirely. Used by tests and
    /// by the storage-failure fallback.
    pub fn ephemeral() -> Self {
        Self {
            token: fresh_token(),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// Return the persisted participant token, generating and storing a new one
/// if none exists yet.
fn get_or_create_token(path: &Path) -> Token {
    let db = match sled::open(path) {
        Ok(db) => db,
        Err(e) => {
            warn!("identity store unavailable ({e}), using session-only token");
            return fresh_token();
        }
    };

    if let Ok(Some(bytes)) = db.get(TOKEN_KEY) {
        if let Ok(token) = String::from_utf8(bytes.to_vec()) {
            return token;
        }
        // Corrupt value: fall through and overwrite with a fresh token.
    }

    let token = fresh_token();
    if let Err(e) = db.insert(TOKEN_KEY, token.as_bytes()) {
        warn!("failed to persist participant token: {e}");
    }
    token
}

fn fresh_token() -> Token {
    Uuid::new_v4().simple().to_string()
}
