//! HTTP routing gateway for the delivery platform.
//!
//! Sits in front of three backend services (auth, orders, and a
//! restaurant/menu service deployed as primary + replica), classifies
//! every inbound request, round-robins restaurant reads, pins writes to
//! the primary, and retries once against the alternate member on a
//! connection-level failure.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod routing;

// Traffic management
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
