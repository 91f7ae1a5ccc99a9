//! Pulse API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p pulse-api
//! ```
//!
//! Configuration is loaded from environment variables, with `.env` picked up when present.

use pulse_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Pulse API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Configuration loaded"
    );

    pulse_api::run(config).await?;

    Ok(())
}
