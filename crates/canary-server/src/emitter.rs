//! Metric emitter: a cancellable periodic task that synthesizes one sample
//! per configured metric type and uploads each as its own write.
//!
//! Failures never stop the loop. A failed placement lookup yields
//! `unknown` resource labels; a failed upload is logged and the sample
//! dropped. The wait for the next tick starts after the current tick has
//! finished, so a slow backend stretches the period instead of piling up
//! ticks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use canary_core::error::Result;
use canary_core::identity::ServerGroup;
use canary_core::protocol::timeseries::{project_resource, CreateTimeSeriesRequest};
use canary_core::sample::{LabelScheme, MetricSample};
use canary_core::synth::{self, ErrorBias};

use crate::config::EmitterSection;
use crate::monitoring::{MetricSink, PlacementSource};

/// Everything the loop needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct EmitterSettings {
    pub project: String,
    pub metric_types: Vec<String>,
    pub interval: Duration,
    pub bias: ErrorBias,
    pub scheme: LabelScheme,
}

impl EmitterSettings {
    /// Resolve settings. Variants labeled by server group require a
    /// hostname matching `<cluster>-v<N>-<suffix>`; a missing hostname is
    /// treated as an empty one and rejected the same way.
    pub fn from_config(cfg: &EmitterSection, hostname: Option<&str>) -> Result<Self> {
        let scheme = if cfg.variant.uses_server_group() {
            let group = ServerGroup::from_hostname(hostname.unwrap_or_default())?;
            tracing::info!(cluster = %group.cluster, server_group = %group.server_group, "resolved server group");
            LabelScheme::ServerGroup(group)
        } else {
            LabelScheme::staging()
        };

        Ok(Self {
            project: project_resource(&cfg.project_id),
            metric_types: cfg.metric_types(),
            interval: cfg.interval(),
            bias: cfg.variant.error_bias(),
            scheme,
        })
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct Emitter {
    settings: EmitterSettings,
    sink: Arc<dyn MetricSink>,
    placement: Arc<dyn PlacementSource>,
    rng: StdRng,
}

impl Emitter {
    pub fn new(settings: EmitterSettings, sink: Arc<dyn MetricSink>, placement: Arc<dyn PlacementSource>) -> Self {
        Self {
            settings,
            sink,
            placement,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic value stream, for tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Build the sample for `metric_type` at the current instant.
    pub fn sample(&mut self, metric_type: &str) -> MetricSample {
        let value = synth::synthesize(
            &mut self.rng,
            metric_type,
            self.settings.bias,
            self.settings.scheme.server_group(),
        );
        MetricSample::new(metric_type, value, Utc::now(), &self.settings.scheme)
    }

    /// Emit one sample per metric type, in order.
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let metric_types = self.settings.metric_types.clone();

        for metric_type in &metric_types {
            let placement = self.placement.placement().await;
            let sample = self.sample(metric_type);
            let req = CreateTimeSeriesRequest::single(&sample, &placement);

            match req.pretty() {
                Ok(body) => tracing::info!(metric = %metric_type, "writeTimeSeriesRequest: {body}"),
                Err(e) => tracing::warn!(metric = %metric_type, error = %e, "could not render request"),
            }

            match self.sink.create_time_series(&self.settings.project, &req).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    tracing::warn!(
                        metric = %metric_type,
                        code = e.code().as_str(),
                        error = %e,
                        "could not write time series value"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Tick, wait the full interval, repeat until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let interval = self.settings.interval;
        tracing::info!(
            project = %self.settings.project,
            metrics = self.settings.metric_types.len(),
            interval_ms = interval.as_millis() as u64,
            "metric emitter started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                report = self.tick() => {
                    tracing::debug!(sent = report.sent, failed = report.failed, "tick done");
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!("metric emitter stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
