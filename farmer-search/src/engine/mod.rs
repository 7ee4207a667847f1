//! Proximity join engine.
//!
//! Answers "farmers within R km of P offering F" by joining two stores: the
//! geo index turns the radius into a candidate key set with distances, and
//! the record store filters those candidates by grocery type and supplies
//! the farmer records. The two calls are sequential because the second
//! depends on the first.

mod features;
mod query;

pub use features::{FeatureFilter, IgnoreFeatures};
pub use query::{NearbyQuery, ResultOrder, DEFAULT_MAX_DISTANCE_KM};

use std::sync::Arc;

use farmer_search_repository::{validate_radius, GeoIndexProvider, RecordStore};
use farmer_search_shared::{store_key_string, Farmer, GeoLocation};
use tracing::{debug, error, instrument};

use crate::errors::CatalogError;

/// Joins geo-index candidates with record-store farmers.
pub struct ProximityJoinEngine {
    geo_index: Arc<dyn GeoIndexProvider>,
    records: Arc<dyn RecordStore>,
    feature_filter: Arc<dyn FeatureFilter>,
    order: ResultOrder,
    default_max_distance_km: f64,
}

impl ProximityJoinEngine {
    /// Create an engine that ignores feature filters and keeps store order.
    pub fn new(geo_index: Arc<dyn GeoIndexProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            geo_index,
            records,
            feature_filter: Arc::new(IgnoreFeatures),
            order: ResultOrder::default(),
            default_max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }

    pub fn with_feature_filter(mut self, feature_filter: Arc<dyn FeatureFilter>) -> Self {
        self.feature_filter = feature_filter;
        self
    }

    pub fn with_result_order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_default_max_distance_km(mut self, max_distance_km: f64) -> Self {
        self.default_max_distance_km = max_distance_km;
        self
    }

    pub fn result_order(&self) -> ResultOrder {
        self.order
    }

    /// A query around `point` using this engine's default radius.
    pub fn query_at(&self, point: GeoLocation) -> NearbyQuery {
        NearbyQuery::new(point).with_max_distance_km(self.default_max_distance_km)
    }

    /// Find every farmer within the query radius that offers all requested
    /// grocery types.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Farmer>)` - Matching farmers with `id` and `distance_km` set.
    ///   Empty if nothing is in range; the record store is not queried then.
    /// * `Err(CatalogError::InvalidArgument)` - Non-positive radius or invalid
    ///   point, detected before any gateway call
    /// * `Err(CatalogError::Upstream)` - The geo index failed
    /// * `Err(CatalogError::Store)` - The record store failed
    /// * `Err(CatalogError::InternalInconsistency)` - The record store returned
    ///   a farmer the geo index did not report
    #[instrument(
        skip(self, query),
        fields(
            longitude = query.point.longitude,
            latitude = query.point.latitude,
            max_distance_km = query.max_distance_km,
            grocery_types = ?query.grocery_types,
        )
    )]
    pub async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<Farmer>, CatalogError> {
        validate_radius(query.max_distance_km)?;
        query.point.validate()?;

        let distances = self
            .geo_index
            .find_nearby(query.point, query.max_distance_km)
            .await
            .map_err(|e| {
                error!(error = %e, "Geo index lookup failed");
                CatalogError::from(e)
            })?;

        if distances.is_empty() {
            debug!("No candidates in range");
            return Ok(Vec::new());
        }

        let keys: Vec<String> = distances.keys().cloned().collect();
        let farmers = self
            .records
            .find_farmers_by_keys_and_types(&keys, &query.grocery_types)
            .await
            .map_err(|e| {
                error!(error = %e, candidates = keys.len(), "Record store lookup failed");
                CatalogError::from(e)
            })?;

        let mut joined = Vec::with_capacity(farmers.len());
        for mut farmer in farmers {
            let key = farmer.key.ok_or_else(|| {
                CatalogError::internal_inconsistency("record store returned a farmer without a key")
            })?;
            let metres = distances.get(&store_key_string(&key)).ok_or_else(|| {
                error!(key = %key, "Joined farmer is missing from the distance map");
                CatalogError::internal_inconsistency(format!(
                    "farmer {} was returned by the record store but not by the geo index",
                    key
                ))
            })?;

            farmer.expose_id();
            farmer.distance_km = Some(metres / 1000.0);
            joined.push(farmer);
        }

        let mut results = self.feature_filter.apply(joined, &query.features);
        if self.order == ResultOrder::NearestFirst {
            sort_nearest_first(&mut results);
        }

        debug!(
            candidates = distances.len(),
            matched = results.len(),
            "Proximity search completed"
        );
        Ok(results)
    }
}

fn sort_nearest_first(farmers: &mut [Farmer]) {
    farmers.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(f64::MAX)
            .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_nearest_first() {
        let mut farmers: Vec<Farmer> = [3.0, 0.5, 1.25]
            .into_iter()
            .map(|d| Farmer {
                distance_km: Some(d),
                ..Farmer::new(format!("{d}"), GeoLocation::new(0.0, 0.0))
            })
            .collect();

        sort_nearest_first(&mut farmers);

        let order: Vec<f64> = farmers.iter().filter_map(|f| f.distance_km).collect();
        assert_eq!(order, vec![0.5, 1.25, 3.0]);
    }
}
