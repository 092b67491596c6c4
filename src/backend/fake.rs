//! In-process stand-in for the simulation backend, used by client tests.

use axum::Router;
use std::time::Duration;

use super::HttpBackend;
use crate::config::BackendConfig;

/// Serves `router` on an ephemeral port and returns a backend pointed at it.
pub(crate) async fn serve(router: Router) -> HttpBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    HttpBackend::new(&BackendConfig {
        api_base: format!("http://{}/api/", addr),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

/// A backend whose port has nothing listening on it.
pub(crate) async fn unreachable() -> HttpBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    HttpBackend::new(&BackendConfig {
        api_base: format!("http://{}/api", addr),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}
