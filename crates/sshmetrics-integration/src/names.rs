//! Metric names, units, help texts and the auth method label.
//!
//! Names are the stable external key of each instrument.

use sshmetrics_core::contract::metrics::Label;

/// Number of connections since start.
pub const METRIC_NAME_CONNECTIONS: &str = "connections";
pub const METRIC_HELP_CONNECTIONS: &str = "Number of connections since start";

/// Number of currently open SSH connections.
pub const METRIC_NAME_CURRENT_CONNECTIONS: &str = "current_connections";
pub const METRIC_HELP_CURRENT_CONNECTIONS: &str = "Current open SSH connections";

/// Successful SSH handshakes since start.
pub const METRIC_NAME_SUCCESSFUL_HANDSHAKE: &str = "handshake_successful";
pub const METRIC_HELP_SUCCESSFUL_HANDSHAKE: &str = "Successful SSH handshakes since start";

/// Failed SSH handshakes since start.
pub const METRIC_NAME_FAILED_HANDSHAKE: &str = "handshake_failed";
pub const METRIC_HELP_FAILED_HANDSHAKE: &str = "Failed SSH handshakes since start";

/// Request failures towards the authentication backend.
pub const METRIC_NAME_AUTH_BACKEND_FAILURE: &str = "auth_server_failures";
pub const METRIC_HELP_AUTH_BACKEND_FAILURE: &str =
    "Number of request failures to the authentication backend";

/// Failed authentications.
pub const METRIC_NAME_AUTH_FAILURE: &str = "auth_failures";
pub const METRIC_HELP_AUTH_FAILURE: &str = "Number of failed authentications";

/// Successful authentications.
pub const METRIC_NAME_AUTH_SUCCESS: &str = "auth_success";
pub const METRIC_HELP_AUTH_SUCCESS: &str = "Number of successful authentications";

pub const UNIT_CONNECTIONS: &str = "connections";
pub const UNIT_HANDSHAKES: &str = "handshakes";
pub const UNIT_ATTEMPTS: &str = "attempts";

/// Label key carrying the auth method.
pub const LABEL_AUTH_TYPE: &str = "authtype";

/// Authentication method, attached to every auth outcome metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    Password,
    PublicKey,
    KeyboardInteractive,
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::Password => "password",
            AuthMethod::PublicKey => "pubkey",
            AuthMethod::KeyboardInteractive => "keyboard-interactive",
        }
    }

    /// `authtype=<method>`
    pub fn label(self) -> Label {
        Label::new(LABEL_AUTH_TYPE, self.as_str())
    }
}
