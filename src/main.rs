mod app_system;
mod config;
mod domain;
mod error;
mod fulfillment;
mod inventory;
mod order_queue;
mod requester;


use tracing::info;

use crate::app_system::{run, setup_tracing};
use crate::config::SystemConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = SystemConfig::default();
    info!(
        initial_stock = config.initial_stock,
        requesters = config.orders.len(),
        "Starting order fulfillment system"
    );

    let report = run(config).await.map_err(|e| e.to_string())?;

    info!(
        processed = report.processed,
        rejected = report.rejected,
        remaining_stock = report.remaining_stock,
        "Fulfillment run complete"
    );
    Ok(())
}
