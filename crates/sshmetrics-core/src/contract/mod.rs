//! Contracts between the SSH server, the handler chain and the metrics backend.
//!
//! - `handler`: the capability set a connection handler implements, from
//!   process readiness down to a single authenticated SSH connection.
//! - `metrics`: the instrument registration and mutation primitives a
//!   metrics backend exposes.
//!
//! Both are plain object-safe traits so decorators can wrap any
//! implementation by composition.

pub mod handler;
pub mod metrics;
