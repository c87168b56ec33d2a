//! Top-level facade crate for sshmetrics.
//!
//! Re-exports the handler/metrics contracts and the metrics decorator so users
//! can depend on a single crate.

pub mod core {
    pub use sshmetrics_core::*;
}

pub mod integration {
    pub use sshmetrics_integration::*;
}
