//! Portfolio site front (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser Request          ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http server ──▶ routing ──▶ views          │
//!                              │   (axum)          (route     (page shell    │
//!     Page shell (#app)        │                    table)     for #app)     │
//!     ◀────────────────────────┼──────────────────────────────────┘           │
//!                              │                                              │
//!                              │   api client ─────────────────────────────────┼──▶ Content API
//!                              │   (base URL + default headers)               │    (:1337/api)
//!                              │                                              │
//!                              │   config · observability · lifecycle         │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use portfolio_site::config::{load_config, SiteConfig};
use portfolio_site::observability::init_logging;
use portfolio_site::{App, SiteServer};

#[derive(Parser)]
#[command(name = "portfolio-site")]
#[command(about = "Serve the portfolio and blog site", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    init_logging(&config.observability)?;

    tracing::info!("portfolio-site v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        api_base_url = %config.api.base_url,
        base_path = %config.router.base_path,
        "Configuration loaded"
    );

    let mount_point = config.server.mount_point.clone();
    let bind_address = config.server.bind_address.clone();

    // Client and routes first, then mount; the listener binds last.
    let app = App::new(config)?.mount(&mount_point)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    SiteServer::new(app).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
