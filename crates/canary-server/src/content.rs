//! Static content handler.
//!
//! Every request gets the bytes of one file, read fresh from disk. The file
//! is a hard dependency: if it cannot be read, the fatal hook runs and, in
//! production, the process exits without answering.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use canary_core::error::{CanaryError, Result};

use crate::app_state::AppState;

/// Called with the error when the content file is unreadable.
pub type FatalHook = Arc<dyn Fn(&CanaryError) + Send + Sync>;

/// Production hook: terminate with status 1.
pub fn exit_process() -> FatalHook {
    Arc::new(|e: &CanaryError| {
        tracing::error!(code = e.code().as_str(), error = %e, "content unavailable, exiting");
        std::process::exit(1);
    })
}

pub async fn read_content(path: &Path) -> Result<Bytes> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|e| CanaryError::ContentUnavailable(format!("{}: {e}", path.display())))
}

pub async fn index(State(state): State<AppState>, req: Request) -> Response {
    tracing::info!(
        method = %req.method(),
        uri = %req.uri(),
        version = ?req.version(),
        headers = ?req.headers(),
        "handling request"
    );

    match read_content(state.content_path()).await {
        Ok(bytes) => Response::new(Body::from(bytes)),
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "couldn't read content file");
            state.fatal(&e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
