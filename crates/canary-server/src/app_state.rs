//! Shared application state for the content server.
//!
//! Holds the loaded config and the fatal hook. The emitter keeps its own
//! state; nothing mutable is shared with the HTTP side.

use std::path::Path;
use std::sync::Arc;

use canary_core::error::CanaryError;

use crate::config::CanaryConfig;
use crate::content::FatalHook;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: CanaryConfig,
    on_fatal: FatalHook,
}

impl AppState {
    pub fn new(cfg: CanaryConfig, on_fatal: FatalHook) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, on_fatal }),
        }
    }

    pub fn content_path(&self) -> &Path {
        &self.inner.cfg.server.content_path
    }

    pub fn fatal(&self, err: &CanaryError) {
        (self.inner.on_fatal)(err)
    }
}
