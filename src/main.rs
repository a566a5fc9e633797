//! JSON:API Router
//!
//! Maps HTTP verbs onto a JSON:API engine reachable over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id / trace / identity layers
//!                         │
//!                         ▼
//!                     route table  ── GET/POST/PATCH/DELETE <mount>/**
//!                         │            (each gated by a config flag)
//!                         ▼
//!                     media checks ── 406 / 415 before the engine
//!                         │
//!                         ▼
//!                     RoutedRequest ─▶ engine (fetch/create/update/delete)
//!                                         │
//!     Client Response                     ▼
//!     ◀────────────── status + body copied unchanged
//! ```

use std::path::PathBuf;

use clap::Parser;

use jsonapi_router::config::{load_config, RouterConfig};
use jsonapi_router::lifecycle::startup;
use jsonapi_router::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "jsonapi-router")]
#[command(about = "Routes HTTP verbs onto a JSON:API engine", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_path = %config.mount.base_path,
        upstream = %config.upstream.url,
        "Configuration loaded"
    );

    if cli.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
