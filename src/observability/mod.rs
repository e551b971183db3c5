//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per binary
//! - Respect RUST_LOG, with a per-binary default filter
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Handlers attach key-value fields (request_id, route, entity ids)
//!   rather than interpolating into messages

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber for a binary.
///
/// `default_filter` applies when RUST_LOG is unset.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
