//! Static routing table with longest-prefix matching.
//!
//! # Responsibilities
//! - Compile the configured routes once at startup
//! - Match request paths against prefixes (case-sensitive)
//! - Strip the matched prefix before forwarding
//!
//! # Design Decisions
//! - Prefixes match on segment boundaries: `/products` matches
//!   `/products` and `/products/42`, never `/productsextra`
//! - A stripped path is always non-empty; bare prefix maps to `/`

use std::str::FromStr;

use axum::http::uri::Authority;
use url::Url;

use crate::config::{RouteConfig, ValidationError};

/// One compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route identifier for logging.
    pub name: String,
    /// Path prefix, without trailing slash.
    pub prefix: String,
    /// Downstream base URL.
    pub upstream: Url,
    /// Pre-built authority for request rewriting.
    pub authority: Authority,
}

/// The result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Path with the matched prefix removed, always starting with `/`.
    pub stripped: String,
}

/// Immutable table of compiled routes, longest prefix first.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile the configured routes. Assumes the config already passed
    /// semantic validation; URL problems are still reported, not hidden.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, ValidationError> {
        let mut routes = Vec::with_capacity(configs.len());
        for config in configs {
            let bad_upstream = || ValidationError::BadUpstream {
                name: config.name.clone(),
                upstream: config.upstream.clone(),
            };

            let upstream = Url::parse(&config.upstream).map_err(|_| bad_upstream())?;
            let host = upstream.host_str().ok_or_else(bad_upstream)?;
            let port = upstream.port_or_known_default().ok_or_else(bad_upstream)?;
            let authority =
                Authority::from_str(&format!("{host}:{port}")).map_err(|_| bad_upstream())?;

            routes.push(Route {
                name: config.name.clone(),
                prefix: config.path_prefix.trim_end_matches('/').to_string(),
                upstream,
                authority,
            });
        }

        // Longest prefix first so the most specific route wins.
        routes.sort_by_key(|r| std::cmp::Reverse(r.prefix.len()));
        Ok(Self { routes })
    }

    /// Look up the route for a request path, returning the matched
    /// route and the prefix-stripped remainder.
    pub fn matches(&self, path: &str) -> Option<RouteMatch<'_>> {
        for route in &self.routes {
            if let Some(rest) = strip_prefix(path, &route.prefix) {
                return Some(RouteMatch {
                    route,
                    stripped: rest,
                });
            }
        }
        None
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Match on segment boundaries and strip. `None` when the prefix does
/// not match.
fn strip_prefix(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    match rest {
        "" => Some("/".to_string()),
        r if r.starts_with('/') => Some(r.to_string()),
        _ => None,
    }
}
