//! Load distribution subsystem.
//!
//! # Data Flow
//! ```text
//! RouteClass { group, kind }
//!     → registry.resolve(group)
//!     → policy.rs (select member per traffic kind)
//!     → chosen BackendDescriptor
//! ```
//!
//! # Design Decisions
//! - Round-robin for reads only; writes always pin to the primary
//! - The rotation cursor is the gateway's only cross-request mutable
//!   state, owned by the policy and updated with a single fetch-add
//! - Approximate fairness under concurrency is acceptable; exact ordering
//!   across concurrent requests is not required

pub mod policy;

pub use policy::DistributionPolicy;
