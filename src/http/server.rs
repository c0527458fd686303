//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the axum Router: local /health plus a catch-all gateway route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Classify, select, and dispatch each inbound request
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::failover::{FailoverController, ProxyBody};
use crate::http::forward::ForwardingEngine;
use crate::load_balancer::DistributionPolicy;
use crate::observability::metrics;
use crate::registry::BackendRegistry;
use crate::routing::{classify, TrafficKind};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BackendRegistry>,
    pub policy: Arc<DistributionPolicy>,
    pub engine: Arc<ForwardingEngine>,
    pub bind_address: String,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Build the server. Fails fast on an invalid backend topology; the
    /// listener must not be bound if this errors.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(BackendRegistry::from_config(&config)?);
        let policy = Arc::new(DistributionPolicy::new());
        let engine = Arc::new(ForwardingEngine::new(Duration::from_secs(
            config.timeouts.upstream_secs,
        )));

        let state = AppState {
            registry,
            policy,
            engine,
            bind_address: config.listener.bind_address.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    // The browser storefront calls the gateway cross-origin;
                    // preflights are answered here, never proxied.
                    .layer(CorsLayer::permissive())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections until the shutdown signal.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Local diagnostic endpoint: the effective topology, never proxied and
/// never consulted for routing decisions.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "gateway running",
        "listen": state.bind_address,
        "topology": state.registry.topology(),
    }))
}

/// Main gateway handler: classify, select, dispatch with failover.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let class = match classify(&method, &path) {
        Ok(class) => class,
        Err(err) => {
            tracing::warn!(method = %method, path = %path, "no route matched");
            metrics::record_unroutable(method.as_str());
            return err.into_response();
        }
    };

    tracing::debug!(
        method = %method,
        path = %path,
        group = %class.group,
        kind = ?class.kind,
        "dispatching request"
    );

    let group = state.registry.resolve(class.group);
    let (parts, body) = request.into_parts();

    // Read bodies are buffered so a failover attempt can replay them;
    // write and passthrough bodies stream through untouched.
    let body = match class.kind {
        TrafficKind::Read => match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => ProxyBody::Replayable(bytes),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read request body");
                return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
            }
        },
        TrafficKind::Write | TrafficKind::Passthrough => ProxyBody::Oneshot(Some(body)),
    };

    let controller = FailoverController::new(&state.policy, &state.engine);
    match controller.dispatch(group, class.kind, &parts, body).await {
        Ok(outcome) => {
            metrics::record_request(
                method.as_str(),
                outcome.response.status().as_u16(),
                &outcome.backend.name,
                start,
            );
            tracing::debug!(
                backend = %outcome.backend.name,
                status = %outcome.response.status(),
                attempts = outcome.attempts,
                "request proxied"
            );
            outcome.response
        }
        Err(err) => {
            tracing::error!(group = %class.group, error = %err, "request failed");
            metrics::record_request(method.as_str(), err.status().as_u16(), "none", start);
            err.into_response()
        }
    }
}
