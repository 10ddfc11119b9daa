//! IPv4 route table service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 ROUTE TABLE                    │
//!                    │                                               │
//!   HTTP request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│ handlers │───▶│  table   │  │
//!                    │  │ server  │    │ (RwLock) │    │  (trie)  │  │
//!   HTTP response    │  └─────────┘    └──────────┘    └──────────┘  │
//!   ◀────────────────┼──────┘                                        │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │  config · observability · lifecycle      │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_table::config::{loader, TableConfig};
use route_table::http::HttpServer;
use route_table::lifecycle::{signals, startup, Shutdown};
use route_table::observability;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the bind address defined in the configuration
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// Override the log level defined in the configuration
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => TableConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }

    observability::logging::init(&config.observability)?;

    tracing::info!("route-table v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let table = startup::build_table(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::forward_to(&signal_shutdown).await;
    });

    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
