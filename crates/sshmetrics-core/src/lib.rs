//! sshmetrics core: SSH handler contracts, metrics backend contracts, and error types.
//!
//! This crate defines the capability sets shared by the SSH server, the
//! handler chain, and any decorator placed in between. It carries no runtime
//! dependencies so backends and decorators can be developed independently.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SshError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod contract;
pub mod error;

/// Shared result type.
pub use error::{Result, SshError};
