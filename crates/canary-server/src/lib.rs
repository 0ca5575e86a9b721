//! canary server library entry.
//!
//! Wires the static content server and the metric emitter. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod content;
pub mod emitter;
pub mod monitoring;
pub mod router;
