//! API gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────┐
//!                      │                 GATEWAY                   │
//!  Client Request      │  ┌─────────┐   ┌───────────────────────┐ │
//!  ────────────────────┼─▶│  table  │──▶│  proxy (URI rewrite,  │ │     ┌──────────────┐
//!                      │  │ (prefix │   │  forwarding headers)  │─┼────▶│ auth service │
//!                      │  │  match) │   └───────────────────────┘ │     ├──────────────┤
//!  Client Response     │  └─────────┘          hyper client       │     │ product svc  │
//!  ◀───────────────────┼───────────── response relayed verbatim ──┼─────┤              │
//!                      │                                          │     │ order svc    │
//!                      └──────────────────────────────────────────┘     └──────┬───────┘
//!                                                                              │
//!                                                                    Arc<dyn DocumentStore>
//!                                                                    (MongoDB | in-memory)
//! ```

use tokio::net::TcpListener;

use shopgate::config::GatewayConfig;
use shopgate::gateway::Gateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    shopgate::observability::init_tracing("shopgate=debug,tower_http=debug");

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        bind_address = %config.bind_address,
        request_timeout_secs = config.request_timeout_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );
    for route in &config.routes {
        tracing::info!(
            route = %route.name,
            prefix = %route.path_prefix,
            upstream = %route.upstream,
            "Route registered"
        );
    }

    let listener = TcpListener::bind(&config.bind_address).await?;
    let gateway = Gateway::new(config)?;
    gateway.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
