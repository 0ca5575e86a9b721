//! `projects.timeSeries.create` request body.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CanaryError, Result};
use crate::identity::Placement;
use crate::sample::MetricSample;

/// Monitored resource type for Compute Engine VMs.
pub const GCE_INSTANCE: &str = "gce_instance";

/// `projects/<project_id>`
pub fn project_resource(project_id: &str) -> String {
    format!("projects/{project_id}")
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest {
    pub time_series: Vec<TimeSeries>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSeries {
    pub metric: Metric,
    pub resource: MonitoredResource,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    pub double_value: f64,
}

impl CreateTimeSeriesRequest {
    /// One series holding one instantaneous point for `sample`.
    pub fn single(sample: &MetricSample, placement: &Placement) -> Self {
        let now = sample.timestamp();

        let mut resource_labels = BTreeMap::new();
        resource_labels.insert("instance_id".to_string(), placement.instance_id_or_unknown().to_string());
        resource_labels.insert("zone".to_string(), placement.zone_or_unknown().to_string());

        Self {
            time_series: vec![TimeSeries {
                metric: Metric {
                    metric_type: sample.metric_type.clone(),
                    labels: sample.labels.clone(),
                },
                resource: MonitoredResource {
                    resource_type: GCE_INSTANCE.to_string(),
                    labels: resource_labels,
                },
                points: vec![Point {
                    interval: TimeInterval {
                        start_time: now.clone(),
                        end_time: now,
                    },
                    value: TypedValue {
                        double_value: sample.value,
                    },
                }],
            }],
        }
    }

    /// Indented JSON for logging.
    pub fn pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CanaryError::Internal(format!("encode time series failed: {e}")))
    }
}
