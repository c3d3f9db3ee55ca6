//! Stockroom service entry point.
//!
//! Initializes logging and the database, seeds the catalog on first run, and
//! prints the current reorder report.

use dotenvy::dotenv;
use stockroom::{
    config,
    core::reorder,
    errors::Result,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(url = %config::database::get_database_url(), "database ready");

    // Seed only when a catalog file is available; a missing file is fine on
    // an already-populated database.
    match config::catalog::load_default_catalog_config() {
        Ok(catalog) => config::catalog::seed_catalog(&db, &catalog).await?,
        Err(e) => warn!("no catalog seeded: {e}"),
    }

    let low = reorder::low_stock_parts(&db).await?;
    if low.is_empty() {
        info!("no parts below their reorder threshold");
    } else {
        for part in &low {
            info!(
                sku = %part.sku,
                name = %part.name,
                stock = part.stock,
                threshold = part.reorder_threshold,
                suggested = reorder::suggested_reorder_qty(part),
                "reorder suggested"
            );
        }
    }

    Ok(())
}
