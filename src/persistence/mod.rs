//! The `persistence` module gives the relay server a durable copy of the
//! live message set, so unexpired messages survive a relay restart.
//!
//! It uses `sled` as an embedded key-value store, keyed by message id.
//! Expired entries are swept out when the set is loaded; from then on the
//! relay's in-memory map is authoritative and persistence is best-effort.

pub mod sled_store;

pub use sled_store::MessageLog;
