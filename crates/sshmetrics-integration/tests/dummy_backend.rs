//! Scriptable backend handler shared by the integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sshmetrics_core::contract::handler::{
    AuthOutcome, AuthResponse, Handler, KeyboardInteractiveChallenge, KeyboardInteractiveQuestion,
    NetworkConnectionHandler, ShutdownContext, SshConnectionHandler,
};
use sshmetrics_core::contract::metrics::GeoIpLookup;
use sshmetrics_core::error::{Result, SshError};
use sshmetrics_integration::config::MetricsConfig;
use sshmetrics_integration::new_handler;
use sshmetrics_integration::obs::{DummyGeoIp, MemoryCollector};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn client(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

pub fn collector() -> Arc<MemoryCollector> {
    Arc::new(MemoryCollector::new(Arc::new(DummyGeoIp)))
}

/// Decorated handler over `backend`, plus the collector it reports to.
pub fn decorated(backend: &DummyBackend) -> (Arc<dyn Handler>, Arc<MemoryCollector>) {
    decorated_with_geo(backend, Arc::new(DummyGeoIp))
}

/// Like [`decorated`], with countries resolved by `geo`.
pub fn decorated_with_geo(
    backend: &DummyBackend,
    geo: Arc<dyn GeoIpLookup>,
) -> (Arc<dyn Handler>, Arc<MemoryCollector>) {
    init_tracing();
    let collector = Arc::new(MemoryCollector::new(geo));
    let handler = new_handler(
        &MetricsConfig::enabled(),
        collector.as_ref(),
        Arc::new(backend.clone()),
    )
    .expect("decorator must build");
    (handler, collector)
}

#[derive(Default)]
pub struct BackendState {
    pub auth: Mutex<Option<AuthOutcome>>,
    pub reject_connections: Mutex<Option<SshError>>,
    pub ready_error: Mutex<Option<SshError>>,
    pub handshake_error: Mutex<Option<SshError>>,
    pub handshake_failures: Mutex<Vec<SshError>>,
    pub accepted: Mutex<Vec<(SocketAddr, String)>>,
    pub disconnects: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub connection_shutdowns: AtomicUsize,
    pub handshake_successes: AtomicUsize,
}

/// Backend whose answers are set by the test before each call.
#[derive(Clone, Default)]
pub struct DummyBackend {
    pub state: Arc<BackendState>,
}

impl DummyBackend {
    pub fn new(response: AuthResponse) -> Self {
        let backend = Self::default();
        backend.answer_auth(AuthOutcome::new(response, None));
        backend
    }

    pub fn answer_auth(&self, outcome: AuthOutcome) {
        *self.state.auth.lock().unwrap() = Some(outcome);
    }

    pub fn reject_connections(&self, err: Option<SshError>) {
        *self.state.reject_connections.lock().unwrap() = err;
    }

    pub fn fail_ready(&self, err: Option<SshError>) {
        *self.state.ready_error.lock().unwrap() = err;
    }

    pub fn fail_handshake(&self, err: Option<SshError>) {
        *self.state.handshake_error.lock().unwrap() = err;
    }

    pub fn disconnects(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }

    fn auth(&self) -> AuthOutcome {
        self.state
            .auth
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(AuthOutcome::success)
    }
}

impl Handler for DummyBackend {
    fn on_ready(&self) -> Result<()> {
        match self.state.ready_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn on_shutdown(&self, _ctx: &ShutdownContext) {
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
    }

    fn on_network_connection(
        &self,
        client: SocketAddr,
        connection_id: &str,
    ) -> Result<Box<dyn NetworkConnectionHandler>> {
        if let Some(err) = self.state.reject_connections.lock().unwrap().clone() {
            return Err(err);
        }
        self.state
            .accepted
            .lock()
            .unwrap()
            .push((client, connection_id.to_string()));
        Ok(Box::new(self.clone()))
    }
}

impl NetworkConnectionHandler for DummyBackend {
    fn on_shutdown(&self, _ctx: &ShutdownContext) {
        self.state.connection_shutdowns.fetch_add(1, Ordering::SeqCst);
    }

    fn on_auth_password(&self, _username: &str, _password: &[u8]) -> AuthOutcome {
        self.auth()
    }

    fn on_auth_pubkey(&self, _username: &str, _pubkey: &str) -> AuthOutcome {
        self.auth()
    }

    fn on_auth_keyboard_interactive(
        &self,
        _username: &str,
        challenge: &mut KeyboardInteractiveChallenge<'_>,
    ) -> AuthOutcome {
        let questions = [KeyboardInteractiveQuestion {
            id: "otp".into(),
            question: "One-time code: ".into(),
            echo: false,
        }];
        match challenge("Second factor required", &questions) {
            Ok(answers) if answers.get("otp").is_some() => self.auth(),
            Ok(_) => AuthOutcome::failure(None),
            Err(err) => AuthOutcome::failure(Some(err)),
        }
    }

    fn on_handshake_failed(&self, reason: SshError) {
        self.state.handshake_failures.lock().unwrap().push(reason);
    }

    fn on_handshake_success(&self, _username: &str) -> Result<Box<dyn SshConnectionHandler>> {
        if let Some(err) = self.state.handshake_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.state.handshake_successes.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(DummySshConnection))
    }

    fn on_disconnect(&self) {
        self.state.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct DummySshConnection;

impl SshConnectionHandler for DummySshConnection {
    fn on_unsupported_global_request(
        &self,
        _request_id: u64,
        _request_type: &str,
        _payload: &[u8],
    ) {
    }

    fn on_unsupported_channel(&self, _channel_id: u64, _channel_type: &str, _extra_data: &[u8]) {}

    fn on_shutdown(&self, _ctx: &ShutdownContext) {}
}
