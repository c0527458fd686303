//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// gateway and tower-http stays at info.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("delivery_gateway={log_level},tower_http=info").into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
