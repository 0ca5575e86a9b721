//! Axum router wiring.
//!
//! The content handler is the fallback, so every path and method is served
//! the same file.

use axum::Router;

use crate::{app_state::AppState, content};

pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(content::index).with_state(state)
}
