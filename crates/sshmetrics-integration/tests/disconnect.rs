//! Open-connection gauge: one decrement per connection, however disconnect arrives.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Barrier};
use std::thread;

use sshmetrics_core::contract::handler::{AuthResponse, NetworkConnectionHandler};
use sshmetrics_integration::names::*;

mod dummy_backend;
use dummy_backend::{client, decorated, DummyBackend};

#[test]
fn repeated_disconnect_decrements_once() {
    let backend = DummyBackend::new(AuthResponse::Success);
    let (handler, c) = decorated(&backend);

    let first = handler.on_network_connection(client(1000), "a").unwrap();
    let second = handler.on_network_connection(client(1001), "b").unwrap();
    assert_eq!(c.total(METRIC_NAME_CURRENT_CONNECTIONS), 2.0);

    first.on_disconnect();
    first.on_disconnect();
    first.on_disconnect();
    assert_eq!(c.total(METRIC_NAME_CURRENT_CONNECTIONS), 1.0);
    // forwarding is not deduplicated
    assert_eq!(backend.disconnects(), 3);

    second.on_disconnect();
    assert_eq!(c.total(METRIC_NAME_CURRENT_CONNECTIONS), 0.0);
    assert_eq!(c.total(METRIC_NAME_CONNECTIONS), 2.0);
}

#[test]
fn concurrent_disconnect_decrements_once() {
    const THREADS: usize = 16;

    let backend = DummyBackend::new(AuthResponse::Success);
    let (handler, c) = decorated(&backend);
    let conn: Arc<dyn NetworkConnectionHandler> =
        Arc::from(handler.on_network_connection(client(2222), "racy").unwrap());

    let barrier = Barrier::new(THREADS);
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                conn.on_disconnect();
            });
        }
    });

    assert_eq!(c.total(METRIC_NAME_CURRENT_CONNECTIONS), 0.0);
    assert_eq!(backend.disconnects(), THREADS);
}

#[test]
fn many_connections_in_parallel() {
    const CONNECTIONS: u16 = 32;

    let backend = DummyBackend::new(AuthResponse::Success);
    let (handler, c) = decorated(&backend);

    thread::scope(|s| {
        for i in 0..CONNECTIONS {
            let handler = Arc::clone(&handler);
            s.spawn(move || {
                let conn = handler
                    .on_network_connection(client(3000 + i), &format!("conn-{i}"))
                    .unwrap();
                let _ = conn.on_auth_password("foo", b"bar");
                // close and cleanup paths both report
                conn.on_disconnect();
                conn.on_disconnect();
            });
        }
    });

    assert_eq!(c.total(METRIC_NAME_CONNECTIONS), f64::from(CONNECTIONS));
    assert_eq!(c.total(METRIC_NAME_AUTH_SUCCESS), f64::from(CONNECTIONS));
    assert_eq!(c.total(METRIC_NAME_CURRENT_CONNECTIONS), 0.0);
    assert_eq!(backend.disconnects(), 2 * usize::from(CONNECTIONS));
}
