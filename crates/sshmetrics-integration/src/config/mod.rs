//! Metrics switch loading.
//!
//! The YAML document carries a `version` and a `metrics` section; unknown
//! keys are rejected at every level so a misspelled `enable` cannot
//! silently leave metrics off.

pub mod schema;

use std::fs;
use std::path::Path;

use sshmetrics_core::error::{Result, SshError};

pub use schema::{AppConfig, MetricsConfig};

/// Read and validate the config at `path`. Errors name the file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        SshError::Internal(format!("cannot read config {}: {e}", path.display()))
    })?;
    load_from_str(&s).map_err(|e| match e {
        SshError::BadRequest(msg) => SshError::BadRequest(format!("{}: {msg}", path.display())),
        other => other,
    })
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    if s.trim().is_empty() {
        return Err(SshError::BadRequest("config is empty, `version` is required".into()));
    }
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| SshError::BadRequest(format!("invalid metrics config: {e}")))?;
    cfg.validate()?;
    tracing::debug!(enable = cfg.metrics.enable, "metrics config loaded");
    Ok(cfg)
}
