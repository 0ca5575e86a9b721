//! Metric samples: one value, one instant, one label set.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::identity::ServerGroup;

/// Value of the static label attached by the staging variant.
pub const STAGING_ENVIRONMENT: &str = "STAGING";

/// Which labels a sample carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelScheme {
    /// `environment=<value>`
    Environment(String),
    /// `cluster=<cluster>`, `servergroup=<server group>`
    ServerGroup(ServerGroup),
}

impl LabelScheme {
    pub fn staging() -> Self {
        LabelScheme::Environment(STAGING_ENVIRONMENT.to_string())
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        match self {
            LabelScheme::Environment(env) => {
                out.insert("environment".to_string(), env.clone());
            }
            LabelScheme::ServerGroup(g) => {
                out.insert("cluster".to_string(), g.cluster.clone());
                out.insert("servergroup".to_string(), g.server_group.clone());
            }
        }
        out
    }

    /// Server group, when the scheme carries one.
    pub fn server_group(&self) -> Option<&ServerGroup> {
        match self {
            LabelScheme::ServerGroup(g) => Some(g),
            LabelScheme::Environment(_) => None,
        }
    }
}

/// A point-in-time measurement. Built per tick and dropped after upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub metric_type: String,
    pub value: f64,
    pub at: DateTime<Utc>,
    pub labels: BTreeMap<String, String>,
}

impl MetricSample {
    pub fn new(metric_type: impl Into<String>, value: f64, at: DateTime<Utc>, scheme: &LabelScheme) -> Self {
        Self {
            metric_type: metric_type.into(),
            value,
            at,
            labels: scheme.labels(),
        }
    }

    /// RFC 3339, UTC, nanosecond precision (`2017-03-06T10:00:00.123456789Z`).
    pub fn timestamp(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn staging_labels() {
        let labels = LabelScheme::staging().labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels["environment"], "STAGING");
    }

    #[test]
    fn server_group_labels() {
        let g = ServerGroup::from_hostname("canary-v3-xyz123").unwrap();
        let labels = LabelScheme::ServerGroup(g).labels();
        assert_eq!(labels["cluster"], "canary");
        assert_eq!(labels["servergroup"], "canary-v3");
    }

    #[test]
    fn timestamp_keeps_nanos() {
        let at = Utc.timestamp_opt(1_488_794_400, 123_456_789).unwrap();
        let s = MetricSample::new("m", 0.0, at, &LabelScheme::staging());
        assert_eq!(s.timestamp(), "2017-03-06T10:00:00.123456789Z");
    }
}
