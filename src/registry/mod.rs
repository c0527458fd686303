//! Backend registry subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig (resolved URLs)
//!     → backend.rs (BackendDescriptor per upstream)
//!     → group.rs (ServiceGroup construction + invariant checks)
//!     → BackendRegistry (frozen, shared via Arc)
//!
//! At runtime:
//!     classifier names a GroupName
//!     → registry.resolve(group) (infallible after startup)
//!     → distribution policy picks a member
//! ```
//!
//! # Design Decisions
//! - Registry is immutable after startup; invalid topology fails fast
//!   before the listener binds
//! - Group invariants (one primary per role-based group, one member per
//!   dedicated group) are enforced at construction, not per request
//! - Topology is exposed as JSON for the /health diagnostic endpoint

pub mod backend;
pub mod group;

pub use backend::{BackendDescriptor, Role};
pub use group::{BackendRegistry, GroupName, ServiceGroup};
