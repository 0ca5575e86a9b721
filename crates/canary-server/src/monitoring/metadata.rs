//! GCE metadata server client.
//!
//! Every request carries `Metadata-Flavor: Google`; the server rejects
//! requests without it.

use async_trait::async_trait;
use serde::Deserialize;

use canary_core::error::{CanaryError, Result};
use canary_core::identity::Placement;

use super::PlacementSource;

const FLAVOR_HEADER: &str = "Metadata-Flavor";
const FLAVOR: &str = "Google";

/// OAuth token as served by the metadata server.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base: String,
}

impl MetadataClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CanaryError::Internal(format!("build metadata client failed: {e}")))?;
        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}/computeMetadata/v1/{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .header(FLAVOR_HEADER, FLAVOR)
            .send()
            .await
            .map_err(|e| CanaryError::MetadataUnavailable(format!("{path}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CanaryError::MetadataUnavailable(format!("{path}: status {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CanaryError::MetadataUnavailable(format!("{path}: {e}")))?;
        Ok(body.trim().to_string())
    }

    pub async fn instance_id(&self) -> Result<String> {
        self.get("instance/id").await
    }

    /// Zone name; the server answers `projects/<num>/zones/<zone>`.
    pub async fn zone(&self) -> Result<String> {
        let full = self.get("instance/zone").await?;
        match full.rsplit('/').next() {
            Some(z) if !z.is_empty() => Ok(z.to_string()),
            _ => Err(CanaryError::MetadataUnavailable(format!("malformed zone {full:?}"))),
        }
    }

    /// Access token of the instance's default service account.
    pub async fn access_token(&self) -> Result<MetadataToken> {
        let body = self
            .get("instance/service-accounts/default/token")
            .await
            .map_err(|e| CanaryError::AuthFailed(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| CanaryError::AuthFailed(format!("invalid token response: {e}")))
    }
}

#[async_trait]
impl PlacementSource for MetadataClient {
    async fn placement(&self) -> Placement {
        let instance_id = match self.instance_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(code = e.code().as_str(), error = %e, "instance id lookup failed");
                None
            }
        };
        let zone = match self.zone().await {
            Ok(z) => Some(z),
            Err(e) => {
                tracing::warn!(code = e.code().as_str(), error = %e, "zone lookup failed");
                None
            }
        };
        Placement { instance_id, zone }
    }
}
