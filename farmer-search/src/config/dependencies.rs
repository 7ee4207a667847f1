//! Dependency initialization and wiring for the farmer search core.

use std::sync::Arc;

use farmer_search_repository::{
    GeoIndexProvider, KineticaProvider, PostgresRecordStore, RecordStore,
};
use tracing::info;

use crate::catalog::CatalogManager;
use crate::config::FarmerSearchConfig;
use crate::engine::ProximityJoinEngine;
use crate::FarmerSearchError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Proximity search over both stores.
    pub engine: ProximityJoinEngine,
    /// Farmer and product mutations over both stores.
    pub catalog: CatalogManager,
}

impl Dependencies {
    /// Build the Kinetica geo index and the PostgreSQL record store from
    /// `config` and wire them into the engine and the catalog manager.
    ///
    /// Neither store is contacted here except to apply migrations when
    /// `config.run_migrations` is set; connections are opened per call.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(FarmerSearchError)` - If a provider cannot be created or the
    ///   migrations fail
    pub async fn new(config: &FarmerSearchConfig) -> Result<Self, FarmerSearchError> {
        let geo_index = KineticaProvider::new(config.geo_index.clone()).map_err(|e| {
            FarmerSearchError::config(format!("Failed to create Kinetica provider: {}", e))
        })?;

        let records = PostgresRecordStore::connect_lazy(&config.record_store).map_err(|e| {
            FarmerSearchError::config(format!("Failed to create record store: {}", e))
        })?;

        if config.run_migrations {
            records.migrate().await.map_err(|e| {
                FarmerSearchError::config(format!("Failed to apply record store migrations: {}", e))
            })?;
            info!("Record store migrations applied");
        }

        Ok(Self::from_providers(
            Arc::new(geo_index),
            Arc::new(records),
            config,
        ))
    }

    /// Wire already constructed providers.
    pub fn from_providers(
        geo_index: Arc<dyn GeoIndexProvider>,
        records: Arc<dyn RecordStore>,
        config: &FarmerSearchConfig,
    ) -> Self {
        let engine = ProximityJoinEngine::new(geo_index.clone(), records.clone())
            .with_result_order(config.result_order)
            .with_default_max_distance_km(config.default_max_distance_km);
        let catalog = CatalogManager::new(geo_index, records);

        info!(result_order = ?config.result_order, "Dependencies initialized");

        Self { engine, catalog }
    }
}
