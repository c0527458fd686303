//! Delivery platform routing gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  GATEWAY                     │
//!  Client Request      │  ┌──────────┐   ┌──────────────┐             │
//!  ────────────────────┼─▶│ http     │──▶│   routing    │             │
//!                      │  │ server   │   │  classifier  │             │
//!                      │  └──────────┘   └──────┬───────┘             │
//!                      │                        ▼                     │
//!                      │                ┌──────────────┐              │
//!                      │                │ distribution │  reads: RR   │
//!                      │                │   policy     │  writes: pin │
//!                      │                └──────┬───────┘              │
//!                      │                        ▼                     │
//!  Client Response     │  ┌──────────┐   ┌──────────────┐   auth ────┼──▶ :4001
//!  ◀───────────────────┼──│ failover │◀──│  forwarding  │   orders ──┼──▶ :4002
//!                      │  │ (1 retry)│   │   engine     │   primary ─┼──▶ :3001
//!                      │  └──────────┘   └──────────────┘   replica ─┼──▶ :5000
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use delivery_gateway::config::load_config;
use delivery_gateway::observability::{logging, metrics};
use delivery_gateway::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "delivery-gateway", about = "HTTP routing gateway")]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:8080).
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("delivery-gateway v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    // Registry construction fails fast on a bad topology, before binding.
    let server = HttpServer::new(config.clone())?;

    // Effective topology, logged exactly once at startup.
    tracing::info!(
        listen = %config.listener.bind_address,
        auth = %config.upstreams.auth,
        orders = %config.upstreams.orders,
        restaurant_primary = %config.upstreams.restaurant_primary,
        restaurant_replica = %config.upstreams.restaurant_replica,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "effective topology"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
