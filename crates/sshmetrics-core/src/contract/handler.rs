//! SSH handler capability set.
//!
//! Three levels, each created by the previous one:
//! - [`Handler`]: process-wide, accepts network connections.
//! - [`NetworkConnectionHandler`]: one per accepted TCP connection, sees
//!   authentication attempts and the handshake outcome.
//! - [`SshConnectionHandler`]: one per completed SSH handshake.
//!
//! All receivers are `&self`: the server may call into the same connection
//! handler from several threads (e.g. disconnect from both the read loop and
//! a cleanup path).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::error::{Result, SshError};

/// Result class of a single authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AuthResponse {
    /// Credentials accepted.
    Success,
    /// Credentials rejected.
    Failure,
    /// The authentication backend could not give an answer.
    Unavailable,
}

impl AuthResponse {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthResponse::Success => "success",
            AuthResponse::Failure => "failure",
            AuthResponse::Unavailable => "unavailable",
        }
    }
}

/// What an auth callback hands back: the response class plus an optional reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub response: AuthResponse,
    pub reason: Option<SshError>,
}

impl AuthOutcome {
    pub fn new(response: AuthResponse, reason: Option<SshError>) -> Self {
        Self { response, reason }
    }

    pub fn success() -> Self {
        Self::new(AuthResponse::Success, None)
    }

    pub fn failure(reason: Option<SshError>) -> Self {
        Self::new(AuthResponse::Failure, reason)
    }

    pub fn unavailable(reason: SshError) -> Self {
        Self::new(AuthResponse::Unavailable, Some(reason))
    }
}

/// One prompt of a keyboard-interactive round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardInteractiveQuestion {
    /// Stable id used to look the answer up.
    pub id: String,
    /// Prompt shown to the user.
    pub question: String,
    /// Whether the client should echo the typed answer.
    pub echo: bool,
}

/// Answers of a keyboard-interactive round, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardInteractiveAnswers {
    answers: HashMap<String, String>,
}

impl KeyboardInteractiveAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, answer: impl Into<String>) {
        self.answers.insert(id.into(), answer.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Callback the server provides so the handler can ask the client questions.
/// Arguments: instruction text, questions.
pub type KeyboardInteractiveChallenge<'a> =
    dyn FnMut(&str, &[KeyboardInteractiveQuestion]) -> Result<KeyboardInteractiveAnswers> + 'a;

/// Caller-supplied bound for a graceful shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShutdownContext {
    deadline: Option<Instant>,
}

impl ShutdownContext {
    /// No deadline: wait as long as needed.
    pub fn unbounded() -> Self {
        Self { deadline: None }
    }

    /// A timeout too large to represent as an `Instant` means unbounded.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` if unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.remaining(), Some(left) if left.is_zero())
    }
}

/// Process-wide handler.
pub trait Handler: Send + Sync {
    /// Called once the listener is up. An error aborts startup.
    fn on_ready(&self) -> Result<()>;

    /// Called when the server is stopping.
    fn on_shutdown(&self, ctx: &ShutdownContext);

    /// Called for every accepted TCP connection. An error closes the connection.
    fn on_network_connection(
        &self,
        client: SocketAddr,
        connection_id: &str,
    ) -> Result<Box<dyn NetworkConnectionHandler>>;
}

/// Per-network-connection handler.
pub trait NetworkConnectionHandler: Send + Sync {
    fn on_shutdown(&self, ctx: &ShutdownContext);

    fn on_auth_password(&self, username: &str, password: &[u8]) -> AuthOutcome;

    fn on_auth_pubkey(&self, username: &str, pubkey: &str) -> AuthOutcome;

    fn on_auth_keyboard_interactive(
        &self,
        username: &str,
        challenge: &mut KeyboardInteractiveChallenge<'_>,
    ) -> AuthOutcome;

    /// The handshake did not complete. No return value.
    fn on_handshake_failed(&self, reason: SshError);

    /// The handshake completed for `username`; the handler may still refuse the session.
    fn on_handshake_success(&self, username: &str) -> Result<Box<dyn SshConnectionHandler>>;

    /// The network connection is gone. May be called more than once.
    fn on_disconnect(&self);
}

/// Handler for an established SSH connection.
pub trait SshConnectionHandler: Send + Sync {
    fn on_unsupported_global_request(&self, request_id: u64, request_type: &str, payload: &[u8]);

    fn on_unsupported_channel(&self, channel_id: u64, channel_type: &str, extra_data: &[u8]);

    fn on_shutdown(&self, ctx: &ShutdownContext);
}

static CONNECTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique connection id (hex).
pub fn generate_connection_id() -> String {
    let seq = CONNECTION_SEQ.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let nanos = u64::try_from(nanos).unwrap_or(u64::MAX);
    format!("{nanos:016x}{seq:08x}")
}
