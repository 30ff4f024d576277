//! Guild ledger API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p guild-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use guild_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the log format can follow the environment
    let config = AppConfig::from_env()?;

    let tracing_config = if config.app.env.is_production() {
        TracingConfig::production()
    } else {
        TracingConfig::development()
    };
    if let Err(e) = try_init_tracing(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        database = config.database.is_some(),
        "Configuration loaded"
    );

    guild_api::run(config).await?;

    Ok(())
}
