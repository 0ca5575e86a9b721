//! Synthetic metric values.
//!
//! Values are uniform in `[0, 1)` scaled by metric kind:
//! - error metrics: `x0.1`, or `x2` for non-baseline clusters under
//!   [`ErrorBias::Baseline`]
//! - everything else: `x0.5`

use rand::Rng;

use crate::identity::ServerGroup;

/// Substring that marks a metric type as an error rate.
pub const ERROR_MARKER: &str = "errors";

const ERROR_SCALE: f64 = 0.1;
const CANARY_ERROR_SCALE: f64 = 2.0;
const AUX_SCALE: f64 = 0.5;

/// How error values are biased across clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBias {
    /// `x0.1` regardless of cluster.
    Flat,
    /// `x0.1` for baseline clusters, `x2` for every other cluster.
    Baseline,
}

/// Whether `metric_type` names an error metric.
pub fn is_error_metric(metric_type: &str) -> bool {
    metric_type.contains(ERROR_MARKER)
}

/// Draw one value for `metric_type`.
///
/// `group` is only consulted under [`ErrorBias::Baseline`]; a missing group
/// counts as non-baseline.
pub fn synthesize<R: Rng + ?Sized>(
    rng: &mut R,
    metric_type: &str,
    bias: ErrorBias,
    group: Option<&ServerGroup>,
) -> f64 {
    let base: f64 = rng.gen();
    base * scale_for(metric_type, bias, group)
}

/// Multiplier applied to the uniform base draw.
pub fn scale_for(metric_type: &str, bias: ErrorBias, group: Option<&ServerGroup>) -> f64 {
    if !is_error_metric(metric_type) {
        return AUX_SCALE;
    }
    match bias {
        ErrorBias::Flat => ERROR_SCALE,
        ErrorBias::Baseline => {
            if group.is_some_and(ServerGroup::is_baseline) {
                ERROR_SCALE
            } else {
                CANARY_ERROR_SCALE
            }
        }
    }
}
