//! Auth service binary: registration, login, token issuance.

use tokio::net::TcpListener;

use shopgate::config::AuthConfig;
use shopgate::{services, storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    shopgate::observability::init_tracing("shopgate=debug");

    let config = AuthConfig::from_env(4000)?;
    let store = storage::connect(&config.service.storage, "users").await;

    let listener = TcpListener::bind(&config.service.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        storage = store.backend().as_str(),
        token_ttl_secs = config.token_ttl_secs,
        "Auth service listening"
    );

    let app = services::auth::router(store, &config.jwt_secret, config.token_ttl_secs);
    axum::serve(listener, app)
        .with_graceful_shutdown(shopgate::lifecycle::shutdown_signal())
        .await?;
    Ok(())
}
