//! Cloud Monitoring v3 REST client (`projects.timeSeries.create` only).

use async_trait::async_trait;

use canary_core::error::{CanaryError, Result};
use canary_core::protocol::timeseries::CreateTimeSeriesRequest;

use crate::config::EmitterSection;

use super::{MetricSink, TokenProvider};

pub struct MonitoringClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: TokenProvider,
}

impl MonitoringClient {
    /// Build the client and fetch a first token, so missing credentials
    /// surface at startup instead of on the first tick.
    pub async fn connect(cfg: &EmitterSection, tokens: TokenProvider) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = cfg.upload_timeout() {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| CanaryError::Internal(format!("build monitoring client failed: {e}")))?;

        tokens.token().await?;

        Ok(Self {
            http,
            endpoint: cfg.monitoring_endpoint.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn time_series_url(&self, project: &str) -> String {
        format!("{}/v3/{}/timeSeries", self.endpoint, project)
    }
}

#[async_trait]
impl MetricSink for MonitoringClient {
    async fn create_time_series(&self, project: &str, req: &CreateTimeSeriesRequest) -> Result<()> {
        let token = self.tokens.token().await?;

        let resp = self
            .http
            .post(self.time_series_url(project))
            .bearer_auth(token)
            .json(req)
            .send()
            .await
            .map_err(|e| CanaryError::UploadFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(CanaryError::UploadFailed(format!("status {status}: {}", body.trim())))
    }
}
