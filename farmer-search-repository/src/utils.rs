//! Utility functions shared by the gateway implementations.

use farmer_search_shared::{parse_store_key, GeoLocation};
use uuid::Uuid;

use crate::errors::{GeoIndexError, RecordStoreError};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Parse a candidate key set into store keys.
///
/// This utility function can be used across record store implementations so
/// that every backend rejects malformed keys the same way: one bad key fails
/// the whole batch.
///
/// # Example
///
/// ```
/// use farmer_search_repository::parse_store_keys;
///
/// let keys = parse_store_keys(&["550e8400e29b41d4a716446655440000".to_string()])
///     .expect("valid key");
/// assert_eq!(keys.len(), 1);
/// ```
pub fn parse_store_keys(keys: &[String]) -> Result<Vec<Uuid>, RecordStoreError> {
    keys.iter()
        .map(|key| {
            parse_store_key(key).map_err(|e| RecordStoreError::invalid_argument(e.to_string()))
        })
        .collect()
}

/// Reject a radius that is zero, negative or not a number.
pub fn validate_radius(max_distance_km: f64) -> Result<(), GeoIndexError> {
    if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
        return Err(GeoIndexError::invalid_argument(format!(
            "max distance must be a positive number of kilometres, got {}",
            max_distance_km
        )));
    }
    Ok(())
}

/// Great-circle distance between two points in metres (haversine formula).
pub fn haversine_distance_m(a: GeoLocation, b: GeoLocation) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
