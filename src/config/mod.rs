//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment (+ optional .env via dotenvy)
//!     → schema.rs (parse into typed config structs)
//!     → validation.rs (semantic checks)
//!     → config fixed for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Configuration is read once at startup and never reloaded
//! - Every variable has a teaching-friendly default so a bare
//!   `cargo run` works with no environment at all
//! - Validation separates syntactic (parse) from semantic checks and
//!   reports all errors, not just the first

pub mod schema;
pub mod validation;

pub use schema::{
    AuthConfig, ConfigError, GatewayConfig, RouteConfig, ServiceConfig, StorageConfig,
};
pub use validation::{validate_gateway, ValidationError};
