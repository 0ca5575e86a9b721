//! Ambient credentials for the monitoring API.
//!
//! Either a fixed bearer token from the environment, or the default service
//! account token from the metadata server, cached until shortly before it
//! expires.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use canary_core::error::{CanaryError, Result};

use super::MetadataClient;

/// Env var holding a static bearer token.
pub const ACCESS_TOKEN_ENV: &str = "CANARY_ACCESS_TOKEN";

/// Refresh this long before the reported expiry.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug)]
enum Source {
    Static(String),
    Metadata(Arc<MetadataClient>),
}

#[derive(Debug)]
struct Cached {
    token: String,
    refresh_at: Instant,
}

#[derive(Debug)]
pub struct TokenProvider {
    source: Source,
    cached: Mutex<Option<Cached>>,
}

impl TokenProvider {
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: Source::Static(token.into()),
            cached: Mutex::new(None),
        }
    }

    pub fn metadata(client: Arc<MetadataClient>) -> Self {
        Self {
            source: Source::Metadata(client),
            cached: Mutex::new(None),
        }
    }

    /// `$CANARY_ACCESS_TOKEN` when set, otherwise the metadata server.
    pub fn from_env(client: Arc<MetadataClient>) -> Self {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(t) if !t.is_empty() => Self::fixed(t),
            _ => Self::metadata(client),
        }
    }

    pub async fn token(&self) -> Result<String> {
        let client = match &self.source {
            Source::Static(t) => return Ok(t.clone()),
            Source::Metadata(c) => c,
        };

        let mut cached = self.cached.lock().await;
        if let Some(c) = cached.as_ref() {
            if Instant::now() < c.refresh_at {
                return Ok(c.token.clone());
            }
        }

        let fresh = client.access_token().await?;
        if fresh.access_token.is_empty() {
            return Err(CanaryError::AuthFailed("metadata server returned an empty token".into()));
        }
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_SLACK);
        tracing::debug!(expires_in = fresh.expires_in, "access token refreshed");

        *cached = Some(Cached {
            token: fresh.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(fresh.access_token)
    }
}
