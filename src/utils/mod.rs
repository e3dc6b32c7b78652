//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `blinkchat` application.
//!
//! This module centralizes the crate's error taxonomy, tracing setup, and
//! the transient-notice mechanism used to surface recoverable failures.

pub mod error;
pub mod logging;
pub mod notice;

pub use error::ChatError;
pub use notice::Notices;
