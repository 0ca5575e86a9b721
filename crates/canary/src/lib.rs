//! Top-level facade crate for the canary demo.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use canary_core::*;
}

pub mod server {
    pub use canary_server::*;
}
