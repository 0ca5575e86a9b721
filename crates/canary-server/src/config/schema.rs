use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use canary_core::error::{CanaryError, Result};
use canary_core::synth::ErrorBias;

pub const ERRORS_METRIC: &str = "custom.googleapis.com/workshop/canary/request/errors";
pub const RANDOM1_METRIC: &str = "custom.googleapis.com/workshop/canary/request/random1";
pub const RANDOM2_METRIC: &str = "custom.googleapis.com/workshop/canary/request/random2";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanaryConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub emitter: EmitterSection,
}

impl Default for CanaryConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            emitter: EmitterSection::default(),
        }
    }
}

impl CanaryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CanaryError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.emitter.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_content_path")]
    pub content_path: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            content_path: default_content_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.content_path.as_os_str().is_empty() {
            return Err(CanaryError::BadConfig("server.content_path must not be empty".into()));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            CanaryError::BadConfig(format!("server.listen {:?} is not a socket address: {e}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:80".into()
}
fn default_content_path() -> PathBuf {
    PathBuf::from("/app/content/index.html")
}

/// Preset behaviours of the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Static `environment=STAGING` label, flat error scale, one metric.
    #[default]
    Staging,
    /// Cluster/server-group labels, baseline-biased errors, one aux metric.
    Canary,
    /// Cluster/server-group labels, flat errors, two aux metrics, fast ticks.
    Fleet,
}

impl Variant {
    pub fn error_bias(self) -> ErrorBias {
        match self {
            Variant::Canary => ErrorBias::Baseline,
            Variant::Staging | Variant::Fleet => ErrorBias::Flat,
        }
    }

    /// Whether samples are labeled from the parsed hostname.
    pub fn uses_server_group(self) -> bool {
        !matches!(self, Variant::Staging)
    }

    pub fn default_metric_types(self) -> Vec<String> {
        let names: &[&str] = match self {
            Variant::Staging => &[ERRORS_METRIC],
            Variant::Canary => &[ERRORS_METRIC, RANDOM1_METRIC],
            Variant::Fleet => &[ERRORS_METRIC, RANDOM1_METRIC, RANDOM2_METRIC],
        };
        names.iter().map(|s| s.to_string()).collect()
    }

    pub fn default_interval_ms(self) -> u64 {
        match self {
            Variant::Fleet => 10_000,
            Variant::Staging | Variant::Canary => 60_000,
        }
    }

    pub fn default_dump_env(self) -> bool {
        matches!(self, Variant::Canary)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterSection {
    #[serde(default)]
    pub variant: Variant,

    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Overrides the variant's metric list.
    #[serde(default)]
    pub metric_types: Option<Vec<String>>,

    /// Overrides the variant's tick interval.
    #[serde(default)]
    pub interval_ms: Option<u64>,

    #[serde(default)]
    pub dump_env: Option<bool>,

    /// Unset means uploads may block the emitter indefinitely.
    #[serde(default)]
    pub upload_timeout_ms: Option<u64>,

    #[serde(default = "default_monitoring_endpoint")]
    pub monitoring_endpoint: String,

    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,
}

impl Default for EmitterSection {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            project_id: default_project_id(),
            metric_types: None,
            interval_ms: None,
            dump_env: None,
            upload_timeout_ms: None,
            monitoring_endpoint: default_monitoring_endpoint(),
            metadata_endpoint: default_metadata_endpoint(),
        }
    }
}

impl EmitterSection {
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(CanaryError::BadConfig("emitter.project_id must not be empty".into()));
        }
        if !(1_000..=3_600_000).contains(&self.interval().as_millis()) {
            return Err(CanaryError::BadConfig(
                "emitter.interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if self.upload_timeout_ms == Some(0) {
            return Err(CanaryError::BadConfig("emitter.upload_timeout_ms must be positive".into()));
        }

        let metrics = self.metric_types();
        if metrics.is_empty() {
            return Err(CanaryError::BadConfig("emitter.metric_types must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for m in &metrics {
            if m.trim().is_empty() {
                return Err(CanaryError::BadConfig("emitter.metric_types entries must not be empty".into()));
            }
            if !seen.insert(m.as_str()) {
                return Err(CanaryError::BadConfig(format!("emitter.metric_types has duplicate {m}")));
            }
        }

        for (name, url) in [
            ("monitoring_endpoint", &self.monitoring_endpoint),
            ("metadata_endpoint", &self.metadata_endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CanaryError::BadConfig(format!(
                    "emitter.{name} must be an http(s) url, got {url:?}"
                )));
            }
        }
        Ok(())
    }

    pub fn metric_types(&self) -> Vec<String> {
        self.metric_types
            .clone()
            .unwrap_or_else(|| self.variant.default_metric_types())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.unwrap_or_else(|| self.variant.default_interval_ms()))
    }

    pub fn dump_env(&self) -> bool {
        self.dump_env.unwrap_or_else(|| self.variant.default_dump_env())
    }

    pub fn upload_timeout(&self) -> Option<Duration> {
        self.upload_timeout_ms.map(Duration::from_millis)
    }
}

fn default_project_id() -> String {
    "qcon-2017-workshop".into()
}
fn default_monitoring_endpoint() -> String {
    "https://monitoring.googleapis.com".into()
}
fn default_metadata_endpoint() -> String {
    "http://metadata.google.internal".into()
}
