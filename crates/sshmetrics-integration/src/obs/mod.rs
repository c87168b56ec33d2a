//! In-process metrics backend.
//!
//! `MemoryCollector` implements the collector contract with atomics keyed by
//! label set, so the decorator can be wired and inspected without an
//! external metrics system. `DummyGeoIp` stands in for a real geo database.

pub mod geoip;
pub mod metrics;

pub use geoip::DummyGeoIp;
pub use metrics::{MemoryCollector, MetricDescriptor, MetricKind, MetricSample};
