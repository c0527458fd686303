//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → Prometheus scrape endpoint (optional, config-gated)
//! ```
//!
//! # Design Decisions
//! - Request IDs flow through tower-http layers and the x-request-id header
//! - Metric updates are cheap atomic increments; never on an error path
//!   alone decides behavior

pub mod logging;
pub mod metrics;
