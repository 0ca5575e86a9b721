//! Remote seams of the emitter: where samples go and where placement
//! comes from.
//!
//! Production uses the Cloud Monitoring REST client and the GCE metadata
//! server; tests plug in fakes.

pub mod auth;
pub mod client;
pub mod metadata;

use async_trait::async_trait;

use canary_core::error::Result;
use canary_core::identity::Placement;
use canary_core::protocol::timeseries::CreateTimeSeriesRequest;

pub use auth::TokenProvider;
pub use client::MonitoringClient;
pub use metadata::MetadataClient;

/// Destination for time series writes.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Write `req` under `project` (`projects/<id>`).
    async fn create_time_series(&self, project: &str, req: &CreateTimeSeriesRequest) -> Result<()>;
}

/// Source of the instance placement attached to each sample.
///
/// Infallible by contract: lookups that fail come back as `None` fields.
#[async_trait]
pub trait PlacementSource: Send + Sync {
    async fn placement(&self) -> Placement;
}
