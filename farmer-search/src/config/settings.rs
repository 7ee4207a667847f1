//! Settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use farmer_search_repository::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_GEO_TABLE};
use farmer_search_repository::{GeoIndexConfig, RecordStoreConfig};
use tracing::{info, warn};

use crate::engine::{ResultOrder, DEFAULT_MAX_DISTANCE_KM};
use crate::FarmerSearchError;

/// Default location of the seed fixture.
const DEFAULT_FIXTURE_PATH: &str = "fixtures/farmers.json";

/// Everything needed to build the engine and the catalog manager.
#[derive(Debug, Clone)]
pub struct FarmerSearchConfig {
    pub geo_index: GeoIndexConfig,
    pub record_store: RecordStoreConfig,
    pub result_order: ResultOrder,
    pub default_max_distance_km: f64,
    pub run_migrations: bool,
    pub fixture_path: PathBuf,
}

impl FarmerSearchConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KINETICA_BASE_URL`: Kinetica REST endpoint (required)
    /// - `KINETICA_AUTHORIZATION`: Authorization header value (required)
    /// - `KINETICA_TABLE`: Geo-index table name (default: farmers)
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `STORE_CONNECT_TIMEOUT_SECS`: Connect timeout of both stores (default: 10)
    /// - `SEARCH_RESULT_ORDER`: "unordered" or "nearest-first" (default: unordered)
    /// - `DEFAULT_MAX_DISTANCE_KM`: Radius used when a query gives none (default: 50)
    /// - `RUN_MIGRATIONS`: Apply the record store schema on startup (default: true)
    /// - `FIXTURE_PATH`: Seed fixture file (default: fixtures/farmers.json)
    ///
    /// # Returns
    ///
    /// * `Ok(FarmerSearchConfig)` - The parsed configuration
    /// * `Err(FarmerSearchError::ConfigError)` - If a required variable is missing
    pub fn from_env() -> Result<Self, FarmerSearchError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FarmerSearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| FarmerSearchError::config(format!("{} must be set", name)))
        };

        let base_url = required("KINETICA_BASE_URL")?;
        let authorization = required("KINETICA_AUTHORIZATION")?;
        let database_url = required("DATABASE_URL")?;

        let table_name = lookup("KINETICA_TABLE").unwrap_or_else(|| DEFAULT_GEO_TABLE.to_string());
        let connect_timeout = lookup("STORE_CONNECT_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);

        let result_order = match lookup("SEARCH_RESULT_ORDER") {
            None => ResultOrder::default(),
            Some(raw) => ResultOrder::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Invalid SEARCH_RESULT_ORDER, defaulting to 'unordered'");
                ResultOrder::default()
            }),
        };

        let default_max_distance_km = lookup("DEFAULT_MAX_DISTANCE_KM")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|km| km.is_finite() && *km > 0.0)
            .unwrap_or(DEFAULT_MAX_DISTANCE_KM);

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|s| !matches!(s.to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let fixture_path = lookup("FIXTURE_PATH")
            .unwrap_or_else(|| DEFAULT_FIXTURE_PATH.to_string())
            .into();

        let config = Self {
            geo_index: GeoIndexConfig::new(base_url, authorization)
                .with_table_name(table_name)
                .with_connect_timeout(connect_timeout),
            record_store: RecordStoreConfig::new(database_url)
                .with_connect_timeout(connect_timeout),
            result_order,
            default_max_distance_km,
            run_migrations,
            fixture_path,
        };

        info!(
            kinetica_url = %config.geo_index.base_url,
            kinetica_table = %config.geo_index.table_name,
            connect_timeout_secs = connect_timeout.as_secs(),
            result_order = ?config.result_order,
            default_max_distance_km = config.default_max_distance_km,
            run_migrations = config.run_migrations,
            "Loaded farmer search configuration"
        );

        Ok(config)
    }
}
