//! Per-request error taxonomy.
//!
//! # Design Decisions
//! - Backend HTTP error responses (4xx/5xx) are data, not errors; they are
//!   forwarded unchanged and never appear here
//! - Transport errors carry the failed backend so the failover controller
//!   can exclude it on the retry
//! - Every variant maps to exactly one client-facing status and JSON body

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::registry::GroupName;

/// Errors a single request can produce inside the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No service group claims this request. Nothing was forwarded.
    #[error("no route for {method} {path}")]
    Unroutable { method: Method, path: String },

    /// Connection-level failure talking to one backend: refused connection,
    /// DNS failure, or upstream timeout. Input to the failover controller.
    #[error("transport failure contacting backend '{backend}' in group '{group}': {source}")]
    Transport {
        group: GroupName,
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// The group has no member left to try (failover exhausted, or every
    /// candidate was excluded).
    #[error("no available backend in group '{group}'")]
    NoAvailableBackend { group: GroupName },
}

impl GatewayError {
    /// Status code surfaced to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unroutable { .. } => StatusCode::NOT_FOUND,
            GatewayError::Transport { .. } | GatewayError::NoAvailableBackend { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            GatewayError::Unroutable { method, path } => json!({
                "error": "no matching route",
                "method": method.as_str(),
                "path": path,
            }),
            GatewayError::Transport { group, backend, .. } => json!({
                "error": format!("{} service unavailable", group),
                "group": group.as_str(),
                "backend": backend,
            }),
            GatewayError::NoAvailableBackend { group } => json!({
                "error": format!("{} service unavailable", group),
                "group": group.as_str(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
