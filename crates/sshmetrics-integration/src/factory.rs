//! Handler factory: registers the instruments and builds the decorator.

use std::sync::Arc;

use sshmetrics_core::contract::handler::Handler;
use sshmetrics_core::contract::metrics::Collector;
use sshmetrics_core::error::Result;

use crate::config::MetricsConfig;
use crate::handler::{HandlerMetrics, MetricsHandler};
use crate::names::*;

/// Wrap `backend` in the metrics decorator.
///
/// With metrics disabled, `backend` itself is returned and nothing is
/// registered. Otherwise every instrument is registered up front; the first
/// registration the collector rejects is returned as the error and no
/// decorator is built.
pub fn new_handler(
    config: &MetricsConfig,
    collector: &dyn Collector,
    backend: Arc<dyn Handler>,
) -> Result<Arc<dyn Handler>> {
    if !config.enable {
        tracing::info!("ssh metrics disabled, handler not decorated");
        return Ok(backend);
    }

    let metrics = register_metrics(collector)?;
    tracing::info!("ssh metrics enabled");
    Ok(Arc::new(MetricsHandler::new(backend, metrics)))
}

fn register_metrics(collector: &dyn Collector) -> Result<HandlerMetrics> {
    let connections = collector.create_counter_geo(
        METRIC_NAME_CONNECTIONS,
        UNIT_CONNECTIONS,
        METRIC_HELP_CONNECTIONS,
    )?;
    let current_connections = collector.create_gauge_geo(
        METRIC_NAME_CURRENT_CONNECTIONS,
        UNIT_CONNECTIONS,
        METRIC_HELP_CURRENT_CONNECTIONS,
    )?;

    let auth_success = collector.create_counter_geo(
        METRIC_NAME_AUTH_SUCCESS,
        UNIT_ATTEMPTS,
        METRIC_HELP_AUTH_SUCCESS,
    )?;
    let auth_failures = collector.create_counter_geo(
        METRIC_NAME_AUTH_FAILURE,
        UNIT_ATTEMPTS,
        METRIC_HELP_AUTH_FAILURE,
    )?;
    let auth_server_failures = collector.create_counter(
        METRIC_NAME_AUTH_BACKEND_FAILURE,
        UNIT_ATTEMPTS,
        METRIC_HELP_AUTH_BACKEND_FAILURE,
    )?;

    let handshake_successful = collector.create_counter_geo(
        METRIC_NAME_SUCCESSFUL_HANDSHAKE,
        UNIT_HANDSHAKES,
        METRIC_HELP_SUCCESSFUL_HANDSHAKE,
    )?;
    let handshake_failed = collector.create_counter_geo(
        METRIC_NAME_FAILED_HANDSHAKE,
        UNIT_HANDSHAKES,
        METRIC_HELP_FAILED_HANDSHAKE,
    )?;

    Ok(HandlerMetrics {
        connections,
        current_connections,
        handshake_successful,
        handshake_failed,
        auth_success,
        auth_failures,
        auth_server_failures,
    })
}
