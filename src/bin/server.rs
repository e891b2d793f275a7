//! Chairside HTTP Server Binary
//!
//! This is the main entry point for the shop REST API server.
//! It initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin chairside-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)
//! - `CHAIRSIDE_CONFIG`: Path to a TOML config file (optional)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use chairside::db::{self, RepositoryConfig, ShopSettings};
use chairside::http::{create_router, AppState};

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
        .with_thread_ids(true)
        .init();

    info!("Starting Chairside HTTP Server");

    // Initialize global repository once and reuse it across the app
    db::init_repository().map_err(|e| anyhow::anyhow!(e))?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Shop tuning from a config file when one exists
    let shop = load_shop_settings()?;
    info!(
        slot_step_minutes = shop.slot_step_minutes,
        default_service_minutes = shop.default_service_minutes,
        "Shop settings loaded"
    );

    // Create application state
    let state = AppState::with_shop(repository, shop);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_shop_settings() -> anyhow::Result<ShopSettings> {
    let config = match env::var("CHAIRSIDE_CONFIG") {
        Ok(path) => Some(RepositoryConfig::from_file(&path)?),
        Err(_) => RepositoryConfig::from_default_locations()?,
    };
    Ok(config.map(|c| c.shop).unwrap_or_default())
}
