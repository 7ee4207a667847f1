use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use farmer_search_shared::{store_key_string, GeoLocation};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::config::DEFAULT_ROW_LIMIT;
use crate::errors::GeoIndexError;
use crate::interfaces::GeoIndexProvider;
use crate::utils::{haversine_distance_m, validate_radius};

/// Operations of the in-memory geo index that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoOperation {
    FindNearby,
    RegisterPoint,
}

/// Geo index holding points in insertion order.
///
/// Distances are great-circle distances in metres. Like the real engine, a
/// radius query returns at most `row_limit` points and does not tell the
/// caller which ones were dropped.
pub struct InMemoryGeoIndex {
    points: Mutex<Vec<(Uuid, GeoLocation)>>,
    row_limit: usize,
    failing: Mutex<HashSet<GeoOperation>>,
    find_calls: AtomicUsize,
}

impl InMemoryGeoIndex {
    pub fn new() -> Self {
        Self::with_row_limit(DEFAULT_ROW_LIMIT)
    }

    pub fn with_row_limit(row_limit: usize) -> Self {
        Self {
            points: Mutex::new(Vec::new()),
            row_limit,
            failing: Mutex::new(HashSet::new()),
            find_calls: AtomicUsize::new(0),
        }
    }

    /// Make `operation` fail with a connection error until reset.
    pub async fn set_failing(&self, operation: GeoOperation, failing: bool) {
        let mut ops = self.failing.lock().await;
        if failing {
            ops.insert(operation);
        } else {
            ops.remove(&operation);
        }
    }

    /// Number of radius queries received, including rejected ones.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Keys of every registered point, in registration order.
    pub async fn registered_keys(&self) -> Vec<Uuid> {
        self.points.lock().await.iter().map(|(key, _)| *key).collect()
    }

    async fn check(&self, operation: GeoOperation) -> Result<(), GeoIndexError> {
        if self.failing.lock().await.contains(&operation) {
            return Err(GeoIndexError::connection(format!(
                "in-memory geo index is unavailable for {:?}",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryGeoIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoIndexProvider for InMemoryGeoIndex {
    async fn find_nearby(
        &self,
        point: GeoLocation,
        max_distance_km: f64,
    ) -> Result<HashMap<String, f64>, GeoIndexError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        validate_radius(max_distance_km)?;
        self.check(GeoOperation::FindNearby).await?;

        let max_distance_m = max_distance_km * 1000.0;
        let points = self.points.lock().await;

        let nearby: HashMap<String, f64> = points
            .iter()
            .filter_map(|(key, location)| {
                let distance = haversine_distance_m(point, *location);
                (distance < max_distance_m).then(|| (store_key_string(key), distance))
            })
            .take(self.row_limit)
            .collect();

        debug!(candidates = nearby.len(), "In-memory radius query returned");
        Ok(nearby)
    }

    async fn register_point(&self, key: &Uuid, point: GeoLocation) -> Result<(), GeoIndexError> {
        self.check(GeoOperation::RegisterPoint).await?;
        self.points.lock().await.push((*key, point));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: GeoLocation = GeoLocation {
        longitude: 13.404954,
        latitude: 52.520008,
    };

    #[tokio::test]
    async fn test_find_nearby_filters_by_radius() {
        let index = InMemoryGeoIndex::new();
        let near = Uuid::new_v4();
        let far = Uuid::new_v4();
        index.register_point(&near, GeoLocation::new(13.41, 52.52)).await.unwrap();
        index.register_point(&far, GeoLocation::new(2.35, 48.85)).await.unwrap();

        let result = index.find_nearby(BERLIN, 50.0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[&store_key_string(&near)] < 1_000.0);
    }

    #[tokio::test]
    async fn test_find_nearby_caps_rows() {
        let index = InMemoryGeoIndex::with_row_limit(3);
        for _ in 0..5 {
            index.register_point(&Uuid::new_v4(), BERLIN).await.unwrap();
        }

        let result = index.find_nearby(BERLIN, 1.0).await.unwrap();
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_find_nearby_rejects_radius_and_counts_call() {
        let index = InMemoryGeoIndex::new();
        let result = index.find_nearby(BERLIN, 0.0).await;

        assert!(matches!(result, Err(GeoIndexError::InvalidArgument(_))));
        assert_eq!(index.find_calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_operation() {
        let index = InMemoryGeoIndex::new();
        index.set_failing(GeoOperation::RegisterPoint, true).await;

        let result = index.register_point(&Uuid::new_v4(), BERLIN).await;
        assert!(matches!(result, Err(GeoIndexError::ConnectionError(_))));
        assert!(index.registered_keys().await.is_empty());

        index.set_failing(GeoOperation::RegisterPoint, false).await;
        assert!(index.register_point(&Uuid::new_v4(), BERLIN).await.is_ok());
    }
}
