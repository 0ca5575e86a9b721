//! Fakes for the emitter seams.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use canary_core::error::{CanaryError, Result};
use canary_core::identity::Placement;
use canary_core::protocol::timeseries::CreateTimeSeriesRequest;
use canary_server::monitoring::{MetricSink, PlacementSource};

#[derive(Debug, Clone)]
pub struct Write {
    pub project: String,
    pub req: CreateTimeSeriesRequest,
    pub at: Instant,
}

/// Records every write; optionally fails them all.
pub struct RecordingSink {
    fail: bool,
    writes: Mutex<Vec<Write>>,
    notify: Option<mpsc::UnboundedSender<Instant>>,
}

impl RecordingSink {
    pub fn ok() -> Self {
        Self { fail: false, writes: Mutex::new(Vec::new()), notify: None }
    }

    pub fn failing() -> Self {
        Self { fail: true, writes: Mutex::new(Vec::new()), notify: None }
    }

    pub fn notifying(mut self, tx: mpsc::UnboundedSender<Instant>) -> Self {
        self.notify = Some(tx);
        self
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn create_time_series(&self, project: &str, req: &CreateTimeSeriesRequest) -> Result<()> {
        let at = Instant::now();
        self.writes.lock().unwrap().push(Write {
            project: project.to_string(),
            req: req.clone(),
            at,
        });
        if let Some(tx) = &self.notify {
            let _ = tx.send(at);
        }
        if self.fail {
            return Err(CanaryError::UploadFailed("simulated network error".into()));
        }
        Ok(())
    }
}

pub struct FixedPlacement(pub Placement);

impl FixedPlacement {
    pub fn known() -> Self {
        Self(Placement {
            instance_id: Some("1234567890".into()),
            zone: Some("us-central1-a".into()),
        })
    }

    pub fn unknown() -> Self {
        Self(Placement::default())
    }
}

#[async_trait]
impl PlacementSource for FixedPlacement {
    async fn placement(&self) -> Placement {
        self.0.clone()
    }
}
