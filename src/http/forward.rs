//! Outbound request forwarding.
//!
//! # Responsibilities
//! - Rewrite scheme/authority to the chosen backend, keep path and query
//! - Copy method and headers verbatim, minus hop-by-hop headers
//! - Stream request and response bodies without size limits
//! - Distinguish transport failures from backend HTTP responses
//!
//! # Design Decisions
//! - A backend's HTTP response is always forwarded as-is: a 500 from the
//!   backend is data to the gateway, not a failover trigger
//! - The per-attempt timeout lives on the client, so a hung backend
//!   surfaces as a transport error within the configured bound

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{
    HeaderMap, HeaderName, CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{request::Parts, Response};

use crate::error::GatewayError;
use crate::registry::BackendDescriptor;

/// Headers that describe the gateway-to-peer hop rather than the request
/// itself. Content-Length is re-derived by the outbound transport.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == HOST
        || *name == CONNECTION
        || *name == PROXY_AUTHENTICATE
        || *name == PROXY_AUTHORIZATION
        || *name == TE
        || *name == TRAILER
        || *name == TRANSFER_ENCODING
        || *name == UPGRADE
        || *name == CONTENT_LENGTH
        || name.as_str() == "keep-alive"
}

/// Proxies one request attempt to one backend.
///
/// Wraps a `reqwest::Client`, which gives uniform HTTP and HTTPS upstream
/// support and connection pooling per backend.
#[derive(Debug, Clone)]
pub struct ForwardingEngine {
    client: reqwest::Client,
}

impl ForwardingEngine {
    /// Build the outbound client with the per-attempt upstream timeout.
    pub fn new(upstream_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .expect("outbound HTTP client construction cannot fail without TLS overrides");
        Self { client }
    }

    /// Forward one attempt. `Ok` carries whatever the backend answered,
    /// any status included; `Err` is strictly connection-level.
    pub async fn forward(
        &self,
        backend: &BackendDescriptor,
        parts: &Parts,
        body: reqwest::Body,
    ) -> Result<Response<Body>, GatewayError> {
        let url = backend.target_url(parts.uri.path(), parts.uri.query());

        let mut headers = HeaderMap::new();
        for (name, value) in &parts.headers {
            if !is_hop_by_hop(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let upstream = self
            .client
            .request(parts.method.clone(), url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                group: backend.group,
                backend: backend.name.clone(),
                source,
            })?;

        let status = upstream.status();
        let upstream_headers = upstream.headers().clone();

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        for (name, value) in &upstream_headers {
            if !is_hop_by_hop(name) {
                response.headers_mut().append(name.clone(), value.clone());
            }
        }
        Ok(response)
    }
}
