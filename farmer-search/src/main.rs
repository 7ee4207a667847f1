//! Farmer Seed Entry Point
//!
//! Loads the fixture farmers and their products into the geo index and the
//! record store through the catalog manager.

use dotenv::dotenv;
use farmer_search::fixtures::{load_fixture, seed};
use farmer_search::{Dependencies, FarmerSearchConfig, FarmerSearchError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("farmer_search=info,farmer_search_repository=info,farmer_seed=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "farmer-seed",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "farmer-seed",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), FarmerSearchError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting farmer seed");

    let config = FarmerSearchConfig::from_env()?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let entries = load_fixture(&config.fixture_path).await?;
    info!(
        path = %config.fixture_path.display(),
        farmers = entries.len(),
        "Loaded fixture"
    );

    match seed(&deps.catalog, entries).await {
        Ok(summary) => {
            info!(
                farmers = summary.farmers,
                products = summary.products,
                "Seeding completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Seeding failed");
            Err(e)
        }
    }
}
