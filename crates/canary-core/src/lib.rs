//! canary core: host identity parsing, value synthesis, metric samples, and
//! the Cloud Monitoring wire types.
//!
//! This crate carries no transport or runtime dependencies so the sampling
//! rules can be exercised without a network or a clock you do not control.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible
//! path surfaces as `CanaryError`/`Result`; a bad hostname is a startup
//! error, not a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod identity;
pub mod protocol;
pub mod sample;
pub mod synth;

/// Shared result type.
pub use error::{CanaryError, ErrorCode, Result};
