//! sshmetrics integration library entry.
//!
//! This crate places a metrics-emitting decorator in front of an SSH
//! handler chain. It wires the config loader, the instrument definitions,
//! the two decorator levels (process-wide and per-connection), and an
//! in-memory reference collector used by embedders and integration tests.

pub mod config;
pub mod factory;
pub mod handler;
pub mod names;
pub mod obs;

pub use factory::new_handler;
pub use names::AuthMethod;
