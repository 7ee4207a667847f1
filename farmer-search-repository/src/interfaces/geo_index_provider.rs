//! Geo-index provider trait definition.
//!
//! This module defines the abstract interface for the geospatial engine,
//! allowing for different backend implementations (Kinetica, in-memory, etc.).

use std::collections::HashMap;

use async_trait::async_trait;
use farmer_search_shared::GeoLocation;
use uuid::Uuid;

use crate::errors::GeoIndexError;

/// Abstracts the geospatial engine holding one point per farmer.
///
/// The geo index knows nothing about farmers beyond their store key and
/// location. It is used purely to turn "within R km of P" into a candidate
/// key set with distances.
#[async_trait]
pub trait GeoIndexProvider: Send + Sync {
    /// Find every indexed point closer than `max_distance_km` to `point`.
    ///
    /// # Arguments
    ///
    /// * `point` - The query point in WGS84 degrees
    /// * `max_distance_km` - The search radius, must be positive
    ///
    /// # Returns
    ///
    /// * `Ok(HashMap<String, f64>)` - Store key (bare hex form) to distance in metres.
    ///   Capped at the provider's row limit; no pagination is performed.
    /// * `Err(GeoIndexError::InvalidArgument)` - If the radius is not positive,
    ///   before any network call
    /// * `Err(GeoIndexError)` - If the engine fails or answers with an unexpected payload
    async fn find_nearby(
        &self,
        point: GeoLocation,
        max_distance_km: f64,
    ) -> Result<HashMap<String, f64>, GeoIndexError>;

    /// Insert one point for a newly created farmer.
    ///
    /// Points are append-only: this is called once per farmer, right after the
    /// farmer record has been created in the record store.
    async fn register_point(&self, key: &Uuid, point: GeoLocation) -> Result<(), GeoIndexError>;
}
