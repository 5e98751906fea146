//! Gen TSO HTTP Server Binary
//!
//! This is the main entry point for the Gen TSO REST API server. It loads
//! the configuration, builds the archive and calculator backends, sets up
//! the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the bundled catalog and synthetic calculator (default)
//! cargo run --bin gentso-server
//!
//! # Run against the live NASA Exoplanet Archive
//! cargo run --bin gentso-server --features "nea-archive,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (overrides gentso.toml)
//! - `PORT`: Server port (overrides gentso.toml)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gentso_rust::archive;
use gentso_rust::calculator;
use gentso_rust::config::AppConfig;
use gentso_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Gen TSO HTTP Server");

    // Load configuration and build the external backends
    let config = AppConfig::from_default_location()?;
    let archive = archive::create_archive(&config)?;
    let calculator = calculator::create_calculator(&config)?;
    info!(
        "Backends ready: archive={}, calculator={}",
        archive.source_name(),
        calculator.backend_name()
    );

    // Determine bind address (env overrides config)
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Create application state and router
    let state = AppState::new(archive, calculator, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
