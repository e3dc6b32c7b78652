//! The `transport` module implements the relay server that realizes the
//! abstract real-time keyed store over websockets.
//!
//! It defines the JSON protocol spoken between chat clients and the relay,
//! the relay's in-memory hub (key assignment, full-snapshot fan-out, TTL
//! sweeping), and the websocket listener that manages connections.

pub mod message;
pub mod relay;
pub mod websocket;

pub use relay::Relay;
pub use websocket::start_relay_server;
