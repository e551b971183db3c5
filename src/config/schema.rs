//! Configuration schema definitions.
//!
//! All settings come from environment variables. Defaults point every
//! component at loopback so the whole system runs locally without any
//! environment prepared.
//!
//! # Environment Variables
//! - `GATEWAY_ADDR` - gateway bind address (default `0.0.0.0:8080`)
//! - `AUTH_SERVICE_URL` / `PRODUCT_SERVICE_URL` / `ORDER_SERVICE_URL` -
//!   downstream base URLs for the gateway routing table
//! - `GATEWAY_TIMEOUT_SECS` - per-request downstream timeout (default 30)
//! - `BIND_ADDR` - service bind address (per-service default port)
//! - `DATABASE_URL` - MongoDB connection string; unset means in-memory
//!   fallback storage
//! - `DATABASE_NAME` - database name (default `shopgate`)
//! - `JWT_SECRET` - token signing secret (auth service)
//! - `TOKEN_TTL_SECS` - token lifetime (default 3600)

use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: String, reason: String },
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: format!("expected an integer, got {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

/// One entry in the gateway routing table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Path prefix to match (stripped before forwarding).
    pub path_prefix: String,

    /// Downstream service base URL.
    pub upstream: String,
}

/// Gateway process configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Static routing table, fixed at startup.
    pub routes: Vec<RouteConfig>,

    /// Downstream request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Read the gateway configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let routes = vec![
            RouteConfig {
                name: "auth".into(),
                path_prefix: "/auth".into(),
                upstream: env_string("AUTH_SERVICE_URL", "http://127.0.0.1:4000"),
            },
            RouteConfig {
                name: "products".into(),
                path_prefix: "/products".into(),
                upstream: env_string("PRODUCT_SERVICE_URL", "http://127.0.0.1:4001"),
            },
            RouteConfig {
                name: "orders".into(),
                path_prefix: "/orders".into(),
                upstream: env_string("ORDER_SERVICE_URL", "http://127.0.0.1:4002"),
            },
        ];

        Ok(Self {
            bind_address: env_string("GATEWAY_ADDR", "0.0.0.0:8080"),
            routes,
            request_timeout_secs: env_u64("GATEWAY_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".into(),
            routes: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Storage backend configuration shared by the domain services.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// MongoDB connection string. `None` selects the in-memory fallback.
    pub database_url: Option<String>,

    /// Database name.
    pub database_name: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            database_name: env_string("DATABASE_NAME", "shopgate"),
        }
    }
}

/// Configuration shared by every domain service process.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address for this service.
    pub bind_address: String,

    /// Storage settings.
    pub storage: StorageConfig,
}

impl ServiceConfig {
    /// Read service configuration, with a per-service default port.
    pub fn from_env(default_port: u16) -> Self {
        Self {
            bind_address: env_string("BIND_ADDR", &format!("0.0.0.0:{default_port}")),
            storage: StorageConfig::from_env(),
        }
    }
}

/// Auth service configuration: service settings plus token signing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub service: ServiceConfig,

    /// HS256 signing secret.
    pub jwt_secret: String,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        let jwt_secret = env_string("JWT_SECRET", "dev-secret-change-me");
        if jwt_secret == "dev-secret-change-me" {
            tracing::warn!("JWT_SECRET not set, using the development default");
        }
        Ok(Self {
            service: ServiceConfig::from_env(default_port),
            jwt_secret,
            token_ttl_secs: env_u64("TOKEN_TTL_SECS", 3600)?,
        })
    }
}
