//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use canary_core::error::{CanaryError, Result};

use crate::monitoring::auth::ACCESS_TOKEN_ENV;

pub use schema::{CanaryConfig, EmitterSection, ServerSection, Variant};

/// Env var naming the YAML config file.
pub const CONFIG_ENV: &str = "CANARY_CONFIG";

/// Placeholder logged instead of secret values.
pub const REDACTED: &str = "<redacted>";

/// Variables whose values never reach the logs.
const SECRET_VARS: &[&str] = &[ACCESS_TOKEN_ENV];

/// Environment listing for the startup dump, sorted by name, with secrets
/// replaced by [`REDACTED`].
pub fn env_dump<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut out: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| {
            if SECRET_VARS.contains(&k.as_str()) {
                (k, REDACTED.to_string())
            } else {
                (k, v)
            }
        })
        .collect();
    out.sort();
    out
}

/// Load from `$CANARY_CONFIG` when set, otherwise use built-in defaults.
pub fn load() -> Result<CanaryConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => load_from_file(&path),
        _ => {
            let cfg = CanaryConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}

pub fn load_from_file(path: &str) -> Result<CanaryConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CanaryError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CanaryConfig> {
    let cfg: CanaryConfig = serde_yaml::from_str(s)
        .map_err(|e| CanaryError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
