//! # Farmer Search
//!
//! Proximity search over farmers and consistency management of their
//! catalog, on top of a geospatial index and a record store.
//!
//! ## Architecture
//!
//! 1. **Engine**: joins geo-index candidates with record-store farmers
//! 2. **Catalog**: adds farmers and products across both stores
//! 3. **Saga**: tracks the steps of the catalog's non-transactional mutations
//! 4. **Fixtures**: seeds the catalog from a JSON file
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`engine`]: The proximity join engine and its query types
//! - [`catalog`]: The catalog consistency manager
//! - [`saga`]: Step tracking for multi-step mutations
//! - [`fixtures`]: Fixture parsing and seeding
//! - [`errors`]: Error taxonomy of the core

pub mod catalog;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fixtures;
pub mod saga;

pub use catalog::CatalogManager;
pub use config::{Dependencies, FarmerSearchConfig};
pub use engine::{FeatureFilter, IgnoreFeatures, NearbyQuery, ProximityJoinEngine, ResultOrder};
pub use errors::CatalogError;
pub use saga::{SagaCursor, SagaKind, SagaStep};

use thiserror::Error;

/// Errors that can occur while starting up or seeding.
#[derive(Error, Debug)]
pub enum FarmerSearchError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Catalog error.
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Fixture file could not be read or parsed.
    #[error("Fixture error: {0}")]
    FixtureError(String),
}

impl FarmerSearchError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a fixture error.
    pub fn fixture(msg: impl Into<String>) -> Self {
        Self::FixtureError(msg.into())
    }
}
