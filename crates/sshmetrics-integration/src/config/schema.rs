use serde::Deserialize;
use sshmetrics_core::error::{Result, SshError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SshError::UnsupportedVersion);
        }
        Ok(())
    }
}

/// Metrics collection switch. Disabled by default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enable: bool,
}

impl MetricsConfig {
    pub fn enabled() -> Self {
        Self { enable: true }
    }

    pub fn disabled() -> Self {
        Self { enable: false }
    }
}
