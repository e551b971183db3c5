//! Gateway HTTP server and the proxy handler.
//!
//! # Responsibilities
//! - Build the axum router (catch-all → proxy handler)
//! - Rewrite the request URI for the matched downstream
//! - Add `x-request-id` and `x-forwarded-for`, relay everything else
//! - Stream the downstream response back without transformation
//! - Map downstream failure to 502 and downstream stall to 504

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::header::HeaderValue;
use axum::http::uri::Scheme;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{validate_gateway, GatewayConfig, ValidationError};
use crate::gateway::table::RouteTable;

/// Error building a gateway (invalid configuration).
#[derive(Debug, thiserror::Error)]
#[error("invalid gateway configuration: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct GatewayError {
    pub errors: Vec<ValidationError>,
}

/// State injected into the proxy handler.
#[derive(Clone)]
struct GatewayState {
    table: Arc<RouteTable>,
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

/// The gateway HTTP server.
pub struct Gateway {
    router: Router,
    config: GatewayConfig,
}

impl Gateway {
    /// Validate the configuration and compile the routing table.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        validate_gateway(&config).map_err(|errors| GatewayError { errors })?;
        let table = RouteTable::from_config(&config.routes)
            .map_err(|e| GatewayError { errors: vec![e] })?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = GatewayState {
            table: Arc::new(table),
            client,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        };

        let router = Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router, config })
    }

    /// Run the gateway, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, routes = self.config.routes.len(), "Gateway starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(crate::lifecycle::shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Match the path, rewrite, forward, relay.
async fn proxy_handler(
    State(state): State<GatewayState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(matched) = state.table.matches(&path) else {
        if path == "/" {
            return (StatusCode::OK, Json(json!({ "status": "gateway alive" }))).into_response();
        }
        tracing::debug!(path = %path, "No route matched");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no_route", "message": "no service handles this path" })),
        )
            .into_response();
    };

    let route_name = matched.route.name.clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Rewrite: downstream authority, prefix-stripped path, original query.
    let path_and_query = match request.uri().query() {
        Some(q) => format!("{}?{}", matched.stripped, q),
        None => matched.stripped.clone(),
    };
    let uri = match Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(matched.route.authority.clone())
        .path_and_query(path_and_query.as_str())
        .build()
    {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "URI rewrite failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal", "message": "request rewrite failed" })),
            )
                .into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        route = %route_name,
        method = %request.method(),
        path = %path,
        forwarded = %path_and_query,
        "Proxying request"
    );

    let (mut parts, body) = request.into_parts();

    // The host header belongs to the gateway; the client fills in the
    // downstream authority from the rewritten URI.
    parts.headers.remove("host");
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert("x-request-id", value);
    }
    let forwarded = match parts.headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        Some(existing) => format!("{existing}, {}", client_addr.ip()),
        None => client_addr.ip().to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&forwarded) {
        parts.headers.insert("x-forwarded-for", value);
    }

    let mut downstream = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = downstream.headers_mut() {
        *headers = parts.headers.clone();
    }
    let downstream = match downstream.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Request rebuild failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal", "message": "request rewrite failed" })),
            )
                .into_response();
        }
    };

    // One attempt, no retries, no failover. A dead downstream is the
    // client's 502; a stalled one the client's 504.
    match tokio::time::timeout(state.request_timeout, state.client.request(downstream)).await {
        Ok(Ok(response)) => {
            let (parts, body): (_, Incoming) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Ok(Err(e)) => {
            tracing::warn!(
                request_id = %request_id,
                route = %route_name,
                error = %e,
                "Downstream unreachable"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "bad_gateway", "message": "downstream service unreachable" })),
            )
                .into_response()
        }
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                route = %route_name,
                timeout_secs = state.request_timeout.as_secs(),
                "Downstream timed out"
            );
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({ "error": "gateway_timeout", "message": "downstream service timed out" })),
            )
                .into_response()
        }
    }
}
