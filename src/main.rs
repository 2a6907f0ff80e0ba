//! Ventas API - analytics over a retail sales dataset
//!
//! Serves a fixed catalog of aggregation queries (top customers, best and
//! worst selling products, monthly sales, ...) over SQLite, plus endpoints
//! to create, wipe and bulk-load the schema from `;` delimited files.

mod config;
mod db;
mod loader;
mod web;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before any other initialization)
    let _ = dotenvy::dotenv();

    let config = config::Config::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));

    // Use LOG_FORMAT=gcp for structured GCP Cloud Logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "gcp" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("Starting Ventas API...");
    info!("Configuration loaded");

    let db = db::Database::new(&config.database).await?;
    info!("Database initialized");

    web::start_server(&config, db).await?;

    Ok(())
}
