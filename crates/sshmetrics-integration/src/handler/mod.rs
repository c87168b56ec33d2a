//! Metrics decorators around an SSH handler chain.
//!
//! - `MetricsHandler` wraps the process-wide `Handler` and counts accepted
//!   connections.
//! - `MetricsNetworkHandler` wraps each per-connection handler and counts
//!   auth outcomes, handshakes, and the open-connection gauge.
//!
//! Both forward every call and return the wrapped handler's results unchanged.

pub mod network;

use std::net::SocketAddr;
use std::sync::Arc;

use sshmetrics_core::contract::handler::{Handler, NetworkConnectionHandler, ShutdownContext};
use sshmetrics_core::contract::metrics::{Counter, GeoCounter, GeoGauge};
use sshmetrics_core::error::Result;

pub use network::MetricsNetworkHandler;

/// Instrument handles shared by the process-wide and per-connection decorators.
pub struct HandlerMetrics {
    pub connections: Arc<dyn GeoCounter>,
    pub current_connections: Arc<dyn GeoGauge>,
    pub handshake_successful: Arc<dyn GeoCounter>,
    pub handshake_failed: Arc<dyn GeoCounter>,
    pub auth_success: Arc<dyn GeoCounter>,
    pub auth_failures: Arc<dyn GeoCounter>,
    /// Not geo-aware: tracks backend health, not client behavior.
    pub auth_server_failures: Arc<dyn Counter>,
}

/// Process-wide decorator.
pub struct MetricsHandler {
    backend: Arc<dyn Handler>,
    metrics: Arc<HandlerMetrics>,
}

impl MetricsHandler {
    pub fn new(backend: Arc<dyn Handler>, metrics: HandlerMetrics) -> Self {
        Self {
            backend,
            metrics: Arc::new(metrics),
        }
    }
}

impl Handler for MetricsHandler {
    fn on_ready(&self) -> Result<()> {
        self.backend.on_ready()
    }

    fn on_shutdown(&self, ctx: &ShutdownContext) {
        self.backend.on_shutdown(ctx);
    }

    fn on_network_connection(
        &self,
        client: SocketAddr,
        connection_id: &str,
    ) -> Result<Box<dyn NetworkConnectionHandler>> {
        // A rejected accept is not a connection.
        let backend = match self.backend.on_network_connection(client, connection_id) {
            Ok(backend) => backend,
            Err(err) => {
                tracing::debug!(
                    %client,
                    connection_id,
                    error = %err,
                    "connection rejected by backend"
                );
                return Err(err);
            }
        };

        let ip = client.ip();
        self.metrics.connections.increment(ip, &[]);
        self.metrics.current_connections.increment(ip, &[]);
        tracing::debug!(%client, connection_id, "connection accepted");

        Ok(Box::new(MetricsNetworkHandler::new(
            backend,
            client,
            connection_id,
            Arc::clone(&self.metrics),
        )))
    }
}
