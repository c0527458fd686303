//! Request classification.
//!
//! # Responsibilities
//! - Assign each inbound request to exactly one service group
//! - Tag restaurant traffic as read or write for the distribution policy
//!
//! # Design Decisions
//! - Namespace matching is segment-aware: "/api/authors" does not match
//!   the "/api/auth" namespace
//! - GET and HEAD classify as reads; every other method on the restaurant
//!   namespace classifies as a write and pins to the primary

use axum::http::Method;

use crate::error::GatewayError;
use crate::registry::GroupName;

/// How a request may be distributed within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficKind {
    /// Load-balanced across the group; eligible for one failover retry.
    Read,
    /// Pinned to the primary; never load-balanced, never failed over.
    Write,
    /// Routed to a sole dedicated backend; no distribution, no failover.
    Passthrough,
}

/// Result of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteClass {
    pub group: GroupName,
    pub kind: TrafficKind,
}

/// Namespaces, checked in precedence order (first match wins).
const AUTH_NAMESPACE: &str = "/api/auth";
const ORDERS_NAMESPACE: &str = "/api/orders";
const RESTAURANT_NAMESPACES: [&str; 2] = ["/api/restaurants", "/api/menus"];

/// Classify a request by method and path.
///
/// Pure and side-effect free; only the distribution policy mutates state.
pub fn classify(method: &Method, path: &str) -> Result<RouteClass, GatewayError> {
    if in_namespace(path, AUTH_NAMESPACE) {
        return Ok(RouteClass {
            group: GroupName::Auth,
            kind: TrafficKind::Passthrough,
        });
    }
    if in_namespace(path, ORDERS_NAMESPACE) {
        return Ok(RouteClass {
            group: GroupName::Orders,
            kind: TrafficKind::Passthrough,
        });
    }
    if RESTAURANT_NAMESPACES.iter().any(|ns| in_namespace(path, ns)) {
        let kind = if matches!(*method, Method::GET | Method::HEAD) {
            TrafficKind::Read
        } else {
            TrafficKind::Write
        };
        return Ok(RouteClass {
            group: GroupName::Restaurant,
            kind,
        });
    }
    Err(GatewayError::Unroutable {
        method: method.clone(),
        path: path.to_string(),
    })
}

/// Segment-aware prefix match: the namespace must be followed by a path
/// separator, a query-ish boundary, or the end of the path.
fn in_namespace(path: &str, namespace: &str) -> bool {
    match path.strip_prefix(namespace) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
