//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     load config → build registry (fail fast) → bind listener → serve
//!
//! Shutdown:
//!     Ctrl+C → Shutdown::trigger → broadcast to server task
//!     → stop accepting → drain in-flight requests → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
