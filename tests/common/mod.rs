//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::net::TcpListener;

use shopgate::config::{GatewayConfig, RouteConfig};
use shopgate::gateway::Gateway;
use shopgate::services;
use shopgate::storage::{DocumentStore, MemoryStore};

/// Serve an axum router on an ephemeral loopback port.
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Product service over a fresh in-memory store.
pub async fn spawn_product_service() -> SocketAddr {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    spawn_router(services::products::router(store)).await
}

/// Order service over a fresh in-memory store.
pub async fn spawn_order_service() -> SocketAddr {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    spawn_router(services::orders::router(store)).await
}

/// Auth service over a fresh in-memory store, test signing secret.
pub async fn spawn_auth_service() -> SocketAddr {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    spawn_router(services::auth::router(store, "test-secret", 3600)).await
}

/// Gateway with the given (name, prefix, upstream address) routes.
pub async fn spawn_gateway(routes: &[(&str, &str, SocketAddr)]) -> SocketAddr {
    spawn_gateway_with_timeout(routes, 5).await
}

/// Gateway with a configurable downstream request timeout.
pub async fn spawn_gateway_with_timeout(
    routes: &[(&str, &str, SocketAddr)],
    request_timeout_secs: u64,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = GatewayConfig {
        bind_address: addr.to_string(),
        routes: routes
            .iter()
            .map(|(name, prefix, upstream)| RouteConfig {
                name: (*name).into(),
                path_prefix: (*prefix).into(),
                upstream: format!("http://{upstream}"),
            })
            .collect(),
        request_timeout_secs,
    };

    let gateway = Gateway::new(config).unwrap();
    tokio::spawn(async move {
        gateway.run(listener).await.unwrap();
    });
    addr
}

/// A backend that accepts connections but never answers, to exercise
/// the gateway's downstream timeout.
pub async fn spawn_stalled_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    // Hold the connection open without responding.
                    tokio::spawn(async move {
                        let _socket = socket;
                        std::future::pending::<()>().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// A backend that records the URI it receives and answers a fixed
/// status and body. Used to observe prefix stripping and verbatim relay.
pub async fn spawn_capture_backend(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, Arc<Mutex<Option<String>>>) {
    let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();

    let app = Router::new().fallback(axum::routing::any(move |req: Request<Body>| {
        let recorder = recorder.clone();
        async move {
            *recorder.lock().unwrap() = Some(req.uri().to_string());
            (status, body)
        }
    }));

    (spawn_router(app).await, seen)
}
