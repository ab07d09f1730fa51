//! HR Portal API Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  PORTAL GATEWAY                  │
//!                         │                                                  │
//!   Portal Request        │  ┌──────────┐   ┌────────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│  http    │──▶│   routes   │──▶│ validation │  │
//!                         │  │  server  │   │ (dispatch) │   │            │  │
//!                         │  └──────────┘   └─────┬──────┘   └────────────┘  │
//!                         │                       │                          │
//!                         │                       ▼                          │
//!                         │                ┌────────────┐                    │
//!                         │                │  backend   │────────────────────┼──▶ HR Backend
//!                         │                │  client    │◀───────────────────┼─── Service
//!                         │                └─────┬──────┘                    │
//!                         │                      │                           │
//!                         │                      ▼                           │
//!   Portal Response       │  ┌──────────┐   ┌────────────┐                   │
//!   ◀─────────────────────┼──│  error   │◀──│ enrichment │                   │
//!                         │  │translator│   │  (fan-out) │                   │
//!                         │  └──────────┘   └────────────┘                   │
//!                         │                                                  │
//!                         │  config · observability · resilience · lifecycle │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use portal_gateway::config::load_config;
use portal_gateway::lifecycle::signals::spawn_signal_listener;
use portal_gateway::observability::{logging, metrics};
use portal_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "portal-gateway")]
#[command(about = "API gateway between the HR portal and its backend service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("portal-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
