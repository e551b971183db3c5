//! Microservices e-commerce stack: gateway plus domain services.
//!
//! One library, four binaries: the gateway (`shopgate`) and the auth,
//! product, and order services (`src/bin/`). The gateway routes by
//! path prefix and relays downstream responses verbatim; each service
//! owns one entity type over an injected document store that falls
//! back to process memory when MongoDB is unreachable.

// Core subsystems
pub mod config;
pub mod gateway;
pub mod services;
pub mod storage;

// Domain model
pub mod domain;
pub mod error;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use gateway::Gateway;
pub use storage::DocumentStore;
