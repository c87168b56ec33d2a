//! Metrics backend contract.
//!
//! A backend registers named instruments once and hands out mutation
//! handles. Geo-aware handles take the client IP and let the backend derive
//! a geographic dimension from it; callers never resolve geography.

use std::net::IpAddr;
use std::sync::Arc;

use crate::error::Result;

/// One `name=value` dimension attached to a metric mutation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Monotonic counter without a geo dimension.
pub trait Counter: Send + Sync {
    fn increment(&self, labels: &[Label]);
}

/// Monotonic counter keyed by the client's geographic origin.
pub trait GeoCounter: Send + Sync {
    fn increment(&self, ip: IpAddr, labels: &[Label]);
}

/// Up/down gauge keyed by the client's geographic origin.
pub trait GeoGauge: Send + Sync {
    fn increment(&self, ip: IpAddr, labels: &[Label]);
    fn decrement(&self, ip: IpAddr, labels: &[Label]);
}

/// Instrument registry.
///
/// Registration fails if the backend rejects the definition (bad or
/// duplicate name). Mutations on a returned handle cannot fail.
pub trait Collector: Send + Sync {
    fn create_counter(&self, name: &str, unit: &str, help: &str) -> Result<Arc<dyn Counter>>;

    fn create_counter_geo(&self, name: &str, unit: &str, help: &str)
        -> Result<Arc<dyn GeoCounter>>;

    fn create_gauge_geo(&self, name: &str, unit: &str, help: &str) -> Result<Arc<dyn GeoGauge>>;
}

/// IP to country-code resolution used by geo-aware backends.
pub trait GeoIpLookup: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> String;
}
