//! Host identity: the cluster/server-group pair parsed from a hostname and
//! the per-tick placement reported by the instance metadata service.
//!
//! Hostnames follow the `<cluster>-v<N>-<suffix>` convention used by
//! deployment tooling for server groups, e.g. `canary-v3-xyz123` is the
//! instance `xyz123` of server group `canary-v3` in cluster `canary`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CanaryError, Result};

/// Sentinel rendered into labels when a placement field is unknown.
pub const UNKNOWN: &str = "unknown";

#[allow(clippy::expect_used)]
static CLUSTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)-v\d+-.*$").expect("cluster pattern"));
#[allow(clippy::expect_used)]
static SERVER_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*-v\d+)-.*$").expect("server group pattern"));

/// Cluster and server group derived from the process hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerGroup {
    pub cluster: String,
    pub server_group: String,
}

impl ServerGroup {
    /// Parse a hostname. Both shapes must match; anything else is a
    /// `HostnameMismatch` so no sample is ever emitted with a made-up label.
    pub fn from_hostname(hostname: &str) -> Result<Self> {
        let cluster = capture(&CLUSTER_RE, hostname)?;
        let server_group = capture(&SERVER_GROUP_RE, hostname)?;
        Ok(Self {
            cluster,
            server_group,
        })
    }

    /// Whether this cluster is the baseline side of a canary comparison.
    pub fn is_baseline(&self) -> bool {
        self.cluster.contains("baseline")
    }
}

fn capture(re: &Regex, hostname: &str) -> Result<String> {
    re.captures(hostname)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CanaryError::HostnameMismatch(hostname.to_string()))
}

/// Where the instance currently runs. Looked up on every tick since live
/// migration can change it; `None` means the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub instance_id: Option<String>,
    pub zone: Option<String>,
}

impl Placement {
    pub fn instance_id_or_unknown(&self) -> &str {
        self.instance_id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn zone_or_unknown(&self) -> &str {
        self.zone.as_deref().unwrap_or(UNKNOWN)
    }
}
