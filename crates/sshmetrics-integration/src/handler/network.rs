//! Per-connection decorator.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use sshmetrics_core::contract::handler::{
    AuthOutcome, AuthResponse, KeyboardInteractiveChallenge, NetworkConnectionHandler,
    ShutdownContext, SshConnectionHandler,
};
use sshmetrics_core::error::{Result, SshError};

use super::HandlerMetrics;
use crate::names::AuthMethod;

/// Wraps one connection's handler.
///
/// Concurrency note: `disconnected` is the only mutable state. It is
/// checked and set under its own lock so the open-connection gauge is
/// decremented exactly once per connection, however many times and from
/// however many threads `on_disconnect` arrives. Auth calls are not
/// serialized.
pub struct MetricsNetworkHandler {
    backend: Box<dyn NetworkConnectionHandler>,
    client: SocketAddr,
    connection_id: String,
    metrics: Arc<HandlerMetrics>,
    disconnected: Mutex<bool>,
}

impl MetricsNetworkHandler {
    pub(crate) fn new(
        backend: Box<dyn NetworkConnectionHandler>,
        client: SocketAddr,
        connection_id: &str,
        metrics: Arc<HandlerMetrics>,
    ) -> Self {
        Self {
            backend,
            client,
            connection_id: connection_id.to_string(),
            metrics,
            disconnected: Mutex::new(false),
        }
    }

    fn record_auth(&self, method: AuthMethod, response: AuthResponse) {
        let labels = [method.label()];
        let ip = self.client.ip();
        match response {
            AuthResponse::Success => self.metrics.auth_success.increment(ip, &labels),
            AuthResponse::Failure => self.metrics.auth_failures.increment(ip, &labels),
            AuthResponse::Unavailable => self.metrics.auth_server_failures.increment(&labels),
            _ => return,
        }
        tracing::trace!(
            connection_id = %self.connection_id,
            method = method.as_str(),
            response = response.as_str(),
            "auth attempt recorded"
        );
    }

    /// Flip the disconnected flag; true only for the first caller.
    fn mark_disconnected(&self) -> bool {
        let mut disconnected = match self.disconnected.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // bool has no invariant to break
                tracing::warn!(connection_id = %self.connection_id, "disconnect lock poisoned");
                poisoned.into_inner()
            }
        };
        if *disconnected {
            return false;
        }
        self.metrics
            .current_connections
            .decrement(self.client.ip(), &[]);
        *disconnected = true;
        true
    }
}

impl NetworkConnectionHandler for MetricsNetworkHandler {
    fn on_shutdown(&self, ctx: &ShutdownContext) {
        self.backend.on_shutdown(ctx);
    }

    fn on_auth_password(&self, username: &str, password: &[u8]) -> AuthOutcome {
        let outcome = self.backend.on_auth_password(username, password);
        self.record_auth(AuthMethod::Password, outcome.response);
        outcome
    }

    fn on_auth_pubkey(&self, username: &str, pubkey: &str) -> AuthOutcome {
        let outcome = self.backend.on_auth_pubkey(username, pubkey);
        self.record_auth(AuthMethod::PublicKey, outcome.response);
        outcome
    }

    fn on_auth_keyboard_interactive(
        &self,
        username: &str,
        challenge: &mut KeyboardInteractiveChallenge<'_>,
    ) -> AuthOutcome {
        let outcome = self.backend.on_auth_keyboard_interactive(username, challenge);
        self.record_auth(AuthMethod::KeyboardInteractive, outcome.response);
        outcome
    }

    fn on_handshake_failed(&self, reason: SshError) {
        self.metrics.handshake_failed.increment(self.client.ip(), &[]);
        self.backend.on_handshake_failed(reason);
    }

    fn on_handshake_success(&self, username: &str) -> Result<Box<dyn SshConnectionHandler>> {
        let result = self.backend.on_handshake_success(username);
        match &result {
            // still a failed handshake, just a late one
            Err(_) => self.metrics.handshake_failed.increment(self.client.ip(), &[]),
            Ok(_) => self.metrics.handshake_successful.increment(self.client.ip(), &[]),
        }
        result
    }

    fn on_disconnect(&self) {
        if self.mark_disconnected() {
            tracing::debug!(
                client = %self.client,
                connection_id = %self.connection_id,
                "connection closed"
            );
        }
        self.backend.on_disconnect();
    }
}
