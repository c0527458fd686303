//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT, *_SERVICE_URL, ...)
//!     → GatewayConfig (immutable)
//!     → registry construction (fail-fast URL/invariant checks)
//! ```
//!
//! # Design Decisions
//! - Every key has a default: a bare environment boots a working local
//!   topology on the conventional ports
//! - Config is immutable once loaded; topology changes require a restart
//! - Environment variables override file values, which override defaults

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig, UpstreamConfig,
};
