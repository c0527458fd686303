//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → classifier.rs (namespace match, precedence order)
//!     → RouteClass { group, traffic kind } or Unroutable
//! ```
//!
//! # Design Decisions
//! - Namespaces compiled in; first match wins, precedence is load-bearing
//!   (auth/orders must never fall through to the restaurant group)
//! - Path matching is segment-aware prefix matching, no regex
//! - Classification is pure: same input always yields the same class

pub mod classifier;

pub use classifier::{classify, RouteClass, TrafficKind};
