//! Order service binary: order creation and status lifecycle.

use tokio::net::TcpListener;

use shopgate::config::ServiceConfig;
use shopgate::{services, storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    shopgate::observability::init_tracing("shopgate=debug");

    let config = ServiceConfig::from_env(4002);
    let store = storage::connect(&config.storage, "orders").await;

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        storage = store.backend().as_str(),
        "Order service listening"
    );

    let app = services::orders::router(store);
    axum::serve(listener, app)
        .with_graceful_shutdown(shopgate::lifecycle::shutdown_signal())
        .await?;
    Ok(())
}
