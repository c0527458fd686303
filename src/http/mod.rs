//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, /health, middleware, gateway handler)
//!     → routing classifier decides group + traffic kind
//!     → failover.rs (per-request attempt state machine)
//!     → forward.rs (outbound request, streamed proxying)
//!     → response returned to client
//! ```

pub mod failover;
pub mod forward;
pub mod server;

pub use failover::{FailoverController, ProxyBody, ProxyOutcome};
pub use forward::ForwardingEngine;
pub use server::HttpServer;
