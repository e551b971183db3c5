//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (parsing handles syntactic)
//! - Check bind addresses and upstream URLs are well formed
//! - Detect empty or conflicting routing tables
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the gateway accepts any traffic

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("routing table is empty")]
    NoRoutes,

    #[error("route {name:?}: path prefix {prefix:?} must start with '/'")]
    BadPrefix { name: String, prefix: String },

    #[error("route {name:?}: duplicate path prefix {prefix:?}")]
    DuplicatePrefix { name: String, prefix: String },

    #[error("route {name:?}: upstream {upstream:?} is not a valid http URL")]
    BadUpstream { name: String, upstream: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a gateway configuration, collecting every problem.
pub fn validate_gateway(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.bind_address.clone(),
        ));
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen_prefixes = Vec::new();
    for route in &config.routes {
        if !route.path_prefix.starts_with('/') || route.path_prefix == "/" {
            errors.push(ValidationError::BadPrefix {
                name: route.name.clone(),
                prefix: route.path_prefix.clone(),
            });
        }

        if seen_prefixes.contains(&route.path_prefix) {
            errors.push(ValidationError::DuplicatePrefix {
                name: route.name.clone(),
                prefix: route.path_prefix.clone(),
            });
        }
        seen_prefixes.push(route.path_prefix.clone());

        match Url::parse(&route.upstream) {
            Ok(url) if url.scheme() == "http" && url.host_str().is_some() => {}
            _ => errors.push(ValidationError::BadUpstream {
                name: route.name.clone(),
                upstream: route.upstream.clone(),
            }),
        }
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
