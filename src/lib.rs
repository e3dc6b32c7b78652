//! # blinkchat
//!
//! `blinkchat` is the core of a self-expiring, real-time message channel:
//! a small group of anonymous participants exchange text, images, and voice
//! clips that are automatically purged 60 seconds after creation, with live
//! fan-out of the full message set to every connected viewer.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `message`: The data model: the wire-level message record and snapshot shape.
//! - `identity`: Issues and persists the pseudonymous participant token.
//! - `codec`: Encodes raw media into inline data URIs, enforcing size ceilings.
//! - `recording`: The microphone capture state machine producing audio payloads.
//! - `store`: The abstract real-time keyed store, in-memory and relay-backed.
//! - `expiry`: Per-writer deferred deletion plus the timestamp sweep.
//! - `view`: The deterministic time-ordered projection for display.
//! - `chat`: The composition root wiring everything into participant operations.
//! - `transport`: The relay server realizing the store over WebSockets.
//! - `persistence`: The relay's durable sled-backed message log.
//! - `config`: Relay configuration loading.
//! - `utils`: Error taxonomy, logging setup, and transient notices.

pub mod chat;
pub mod codec;
pub mod config;
pub mod expiry;
pub mod identity;
pub mod message;
pub mod persistence;
pub mod recording;
pub mod store;
pub mod transport;
pub mod utils;
pub mod view;
