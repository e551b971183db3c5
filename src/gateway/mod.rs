//! Gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers, body)
//!     → table.rs (longest-prefix lookup, prefix strip)
//!     → proxy.rs (rewrite URI, add forwarding headers)
//!     → hyper client → downstream service
//!     → response relayed verbatim (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - Routing table compiled at startup, immutable at runtime
//! - Longest prefix wins; no regex in the hot path
//! - No retries, no failover, no caching: a downstream outage is the
//!   client's 502, a downstream stall the client's 504

pub mod proxy;
pub mod table;

pub use proxy::Gateway;
pub use table::{Route, RouteTable};
