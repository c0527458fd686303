//! Per-request failover state machine.
//!
//! Two states, two outbound attempts at most:
//!
//! ```text
//! PrimaryAttempt ── success ──────────────────────▶ done
//!      │ transport failure
//!      ├─ read traffic, multi-member group ──▶ FallbackAttempt (terminal)
//!      └─ write/passthrough ────────────────▶ gateway failure (503)
//!
//! FallbackAttempt ── success ──▶ done
//!      └─ transport failure ──▶ gateway failure (503), no third attempt
//! ```
//!
//! Write and passthrough traffic never fails over: writes are pinned to
//! the primary and dedicated groups have no alternate member.

use axum::body::{Body, Bytes};
use axum::http::{request::Parts, Response};

use crate::error::GatewayError;
use crate::http::forward::ForwardingEngine;
use crate::load_balancer::DistributionPolicy;
use crate::observability::metrics;
use crate::registry::{BackendDescriptor, ServiceGroup};
use crate::routing::TrafficKind;
use std::sync::Arc;

/// Request body as seen by the attempt loop.
///
/// Read traffic is buffered so the fallback attempt can replay it; write
/// and passthrough bodies stream through once, unbounded.
pub enum ProxyBody {
    Replayable(Bytes),
    Oneshot(Option<Body>),
}

impl ProxyBody {
    /// Body for the next outbound attempt. `None` when a one-shot stream
    /// has already been consumed.
    fn next_attempt(&mut self) -> Option<reqwest::Body> {
        match self {
            ProxyBody::Replayable(bytes) => Some(reqwest::Body::from(bytes.clone())),
            ProxyBody::Oneshot(body) => body
                .take()
                .map(|b| reqwest::Body::wrap_stream(b.into_data_stream())),
        }
    }

    fn replayable(&self) -> bool {
        matches!(self, ProxyBody::Replayable(_))
    }
}

/// Result of a successful dispatch, for logging and metrics.
pub struct ProxyOutcome {
    pub response: Response<Body>,
    pub backend: Arc<BackendDescriptor>,
    /// 1 for a clean primary attempt, 2 when the fallback served it.
    pub attempts: u8,
}

/// Drives at most two forwarding attempts against one service group.
pub struct FailoverController<'a> {
    policy: &'a DistributionPolicy,
    engine: &'a ForwardingEngine,
}

impl<'a> FailoverController<'a> {
    pub fn new(policy: &'a DistributionPolicy, engine: &'a ForwardingEngine) -> Self {
        Self { policy, engine }
    }

    /// Run the state machine for one request.
    pub async fn dispatch(
        &self,
        group: &ServiceGroup,
        kind: TrafficKind,
        parts: &Parts,
        mut body: ProxyBody,
    ) -> Result<ProxyOutcome, GatewayError> {
        // PrimaryAttempt: the policy's first choice.
        let first = self.policy.select(group, kind, &[])?;
        let first_body = body
            .next_attempt()
            .ok_or(GatewayError::NoAvailableBackend { group: group.name })?;

        let first_err = match self.engine.forward(&first, parts, first_body).await {
            Ok(response) => {
                return Ok(ProxyOutcome {
                    response,
                    backend: first,
                    attempts: 1,
                })
            }
            Err(err) => err,
        };

        if !self.fallback_eligible(group, kind, &body) {
            return Err(first_err);
        }

        // FallbackAttempt: one retry against the other member, terminal.
        tracing::warn!(
            group = %group.name,
            failed_backend = %first.name,
            error = %first_err,
            "transport failure, attempting failover"
        );
        metrics::record_failover(group.name.as_str());

        let fallback = self.policy.select(group, kind, &[first.name.as_str()])?;
        let fallback_body = body
            .next_attempt()
            .ok_or(GatewayError::NoAvailableBackend { group: group.name })?;

        match self.engine.forward(&fallback, parts, fallback_body).await {
            Ok(response) => Ok(ProxyOutcome {
                response,
                backend: fallback,
                attempts: 2,
            }),
            Err(err) => {
                tracing::error!(
                    group = %group.name,
                    failed_backend = %fallback.name,
                    error = %err,
                    "failover attempt failed, group exhausted"
                );
                Err(GatewayError::NoAvailableBackend { group: group.name })
            }
        }
    }

    /// Only read traffic against a multi-member group, with a replayable
    /// body, earns the single retry.
    fn fallback_eligible(&self, group: &ServiceGroup, kind: TrafficKind, body: &ProxyBody) -> bool {
        kind == TrafficKind::Read && group.len() > 1 && body.replayable()
    }
}
