use std::net::IpAddr;

use sshmetrics_core::contract::metrics::GeoIpLookup;

/// Country code returned when no geo database is configured.
pub const UNKNOWN_COUNTRY: &str = "XX";

/// Geo lookup that never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyGeoIp;

impl GeoIpLookup for DummyGeoIp {
    fn lookup(&self, _ip: IpAddr) -> String {
        UNKNOWN_COUNTRY.to_string()
    }
}
