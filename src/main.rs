#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use ordershop::errors::Result;
use ordershop::{config, core, demo};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the catalog seed configuration; a missing file just means an
    //    empty catalog.
    let catalog = match config::catalog::load_default_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("No usable catalog.toml, starting with an empty catalog: {e}");
            config::catalog::CatalogConfig::default()
        }
    };

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Tables created."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed the item catalog (skips names already present)
    let seeded = core::item::seed_catalog(&db, &catalog)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {e}"))?;
    info!(seeded, "Catalog seeding finished.");

    // 6. Run the lifecycle walkthroughs
    demo::run_all(&db)
        .await
        .inspect_err(|e| error!("Walkthrough failed: {e}"))?;

    info!("All walkthroughs finished.");
    Ok(())
}
