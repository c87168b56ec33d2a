//! Minimal metrics registry backing the collector contract.
//!
//! Counter and gauge families hold dynamic label sets in `DashMap`. Labels
//! are flattened into sorted key vectors to keep deterministic ordering.
//! Geo-aware instruments add a `country` label resolved at mutation time.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use sshmetrics_core::contract::metrics::{
    Collector, Counter, GeoCounter, GeoGauge, GeoIpLookup, Label,
};
use sshmetrics_core::error::{Result, SshError};

/// Label key added by geo-aware instruments.
pub const COUNTRY_LABEL: &str = "country";

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[Label], country: Option<String>) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|l| (l.name.clone(), l.value.clone()))
        .collect();
    if let Some(c) = country {
        key.push((COUNTRY_LABEL.to_string(), c));
    }
    key.sort();
    key
}

#[derive(Default)]
struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    fn inc(&self, key: LabelKey) {
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn samples(&self) -> Vec<MetricSample> {
        self.map
            .iter()
            .map(|r| MetricSample::new(r.key(), r.value().load(Ordering::Relaxed) as f64))
            .collect()
    }
}

#[derive(Default)]
struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    fn add(&self, key: LabelKey, v: i64) {
        let gauge = self.map.entry(key).or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    fn samples(&self) -> Vec<MetricSample> {
        self.map
            .iter()
            .map(|r| MetricSample::new(r.key(), r.value().load(Ordering::Relaxed) as f64))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

/// Registration data of one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: String,
    pub kind: MetricKind,
    pub unit: String,
    pub help: String,
    pub geo: bool,
}

/// Current value of one label set.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

impl MetricSample {
    fn new(key: &LabelKey, value: f64) -> Self {
        Self {
            labels: key.iter().cloned().collect(),
            value,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

enum Family {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
}

struct Registered {
    descriptor: MetricDescriptor,
    family: Family,
}

struct SimpleCounter {
    values: Arc<CounterVec>,
}

impl Counter for SimpleCounter {
    fn increment(&self, labels: &[Label]) {
        self.values.inc(label_key(labels, None));
    }
}

struct SimpleGeoCounter {
    values: Arc<CounterVec>,
    geo: Arc<dyn GeoIpLookup>,
}

impl GeoCounter for SimpleGeoCounter {
    fn increment(&self, ip: IpAddr, labels: &[Label]) {
        self.values.inc(label_key(labels, Some(self.geo.lookup(ip))));
    }
}

struct SimpleGeoGauge {
    values: Arc<GaugeVec>,
    geo: Arc<dyn GeoIpLookup>,
}

impl GeoGauge for SimpleGeoGauge {
    fn increment(&self, ip: IpAddr, labels: &[Label]) {
        self.values.add(label_key(labels, Some(self.geo.lookup(ip))), 1);
    }

    fn decrement(&self, ip: IpAddr, labels: &[Label]) {
        self.values.add(label_key(labels, Some(self.geo.lookup(ip))), -1);
    }
}

/// Prometheus-style name rule: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(SshError::InvalidMetric("metric name must not be empty".into()));
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == ':') {
        return Err(SshError::InvalidMetric(format!("{name}: invalid first character")));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
        return Err(SshError::InvalidMetric(format!("{name}: invalid character")));
    }
    Ok(())
}

/// In-memory collector. Instruments live as long as the collector.
pub struct MemoryCollector {
    geo: Arc<dyn GeoIpLookup>,
    families: DashMap<String, Registered>,
}

impl MemoryCollector {
    pub fn new(geo: Arc<dyn GeoIpLookup>) -> Self {
        Self {
            geo,
            families: DashMap::new(),
        }
    }

    fn register(&self, descriptor: MetricDescriptor, family: Family) -> Result<()> {
        validate_name(&descriptor.name)?;
        match self.families.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => Err(SshError::DuplicateMetric(descriptor.name)),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    metric = %descriptor.name,
                    kind = ?descriptor.kind,
                    geo = descriptor.geo,
                    "metric registered"
                );
                slot.insert(Registered { descriptor, family });
                Ok(())
            }
        }
    }

    fn descriptor_for(
        name: &str,
        kind: MetricKind,
        unit: &str,
        help: &str,
        geo: bool,
    ) -> MetricDescriptor {
        MetricDescriptor {
            name: name.to_string(),
            kind,
            unit: unit.to_string(),
            help: help.to_string(),
            geo,
        }
    }

    /// Registration data, if `name` was registered.
    pub fn descriptor(&self, name: &str) -> Option<MetricDescriptor> {
        self.families.get(name).map(|r| r.value().descriptor.clone())
    }

    /// Names of all registered instruments, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.families.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Current values of every label set touched so far, sorted by labels.
    /// Empty when the instrument was never mutated or is unknown.
    pub fn get_metric(&self, name: &str) -> Vec<MetricSample> {
        let Some(reg) = self.families.get(name) else {
            return vec![];
        };
        let mut samples = match &reg.value().family {
            Family::Counter(c) => c.samples(),
            Family::Gauge(g) => g.samples(),
        };
        samples.sort_by(|a, b| a.labels.cmp(&b.labels));
        samples
    }

    /// Sum over all label sets.
    pub fn total(&self, name: &str) -> f64 {
        self.get_metric(name).iter().map(|s| s.value).sum()
    }
}

impl Collector for MemoryCollector {
    fn create_counter(&self, name: &str, unit: &str, help: &str) -> Result<Arc<dyn Counter>> {
        let values = Arc::new(CounterVec::default());
        let descriptor = Self::descriptor_for(name, MetricKind::Counter, unit, help, false);
        self.register(descriptor, Family::Counter(Arc::clone(&values)))?;
        Ok(Arc::new(SimpleCounter { values }))
    }

    fn create_counter_geo(
        &self,
        name: &str,
        unit: &str,
        help: &str,
    ) -> Result<Arc<dyn GeoCounter>> {
        let values = Arc::new(CounterVec::default());
        let descriptor = Self::descriptor_for(name, MetricKind::Counter, unit, help, true);
        self.register(descriptor, Family::Counter(Arc::clone(&values)))?;
        Ok(Arc::new(SimpleGeoCounter {
            values,
            geo: Arc::clone(&self.geo),
        }))
    }

    fn create_gauge_geo(&self, name: &str, unit: &str, help: &str) -> Result<Arc<dyn GeoGauge>> {
        let values = Arc::new(GaugeVec::default());
        let descriptor = Self::descriptor_for(name, MetricKind::Gauge, unit, help, true);
        self.register(descriptor, Family::Gauge(Arc::clone(&values)))?;
        Ok(Arc::new(SimpleGeoGauge {
            values,
            geo: Arc::clone(&self.geo),
        }))
    }
}
