//! Blog backend server.
//!
//! Loads configuration, initializes logging and hands over to the API crate.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use blog_core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("BLOG_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = blog_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        return Err(e).context("Server terminated with an error");
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
