//! Proctoring Monitor - Main Entry Point
//!
//! Usage: `proctor-monitor [config-file]` (default `proctor.toml`)

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "proctor.toml".to_string());
    let config = AppConfig::load(&path)?;

    init_logging(&config.logging);

    info!("=== Proctor Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from {} (if present) and PROCTOR__* environment", path);

    run_server(config).await
}
