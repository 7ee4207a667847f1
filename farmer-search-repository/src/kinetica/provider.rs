//! Kinetica provider implementation.
//!
//! This module provides the concrete implementation of `GeoIndexProvider`
//! on top of the Kinetica REST API using `reqwest`.

use std::collections::HashMap;

use async_trait::async_trait;
use farmer_search_shared::{store_key_string, GeoLocation};
use reqwest::{header, Client};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::GeoIndexConfig;
use crate::errors::GeoIndexError;
use crate::interfaces::GeoIndexProvider;
use crate::kinetica::envelope::{
    ColumnarTable, ExecuteSqlResponse, ResponseEnvelope, EXECUTE_SQL_DATA_TYPE,
    INSERT_RECORDS_DATA_TYPE,
};
use crate::kinetica::statement::{
    distance_statement, validate_table_name, ExecuteSqlRequest, InsertPointRequest,
    DISTANCE_COLUMN, KEY_COLUMN,
};
use crate::utils::validate_radius;

/// Kinetica provider implementation.
///
/// Issues one HTTP request per call. The client has a fixed connect timeout
/// and never retries, so a transient failure reaches the caller immediately.
///
/// # Example
///
/// ```ignore
/// use farmer_search_repository::{GeoIndexConfig, KineticaProvider, GeoIndexProvider};
/// use farmer_search_shared::GeoLocation;
///
/// let config = GeoIndexConfig::new("https://kinetica.example.com/gpudb-0", "Basic ...");
/// let provider = KineticaProvider::new(config)?;
///
/// let nearby = provider.find_nearby(GeoLocation::new(13.4, 52.5), 50.0).await?;
/// ```
pub struct KineticaProvider {
    client: Client,
    config: GeoIndexConfig,
    execute_sql_url: Url,
    insert_records_url: Url,
}

impl KineticaProvider {
    /// Create a new Kinetica provider.
    ///
    /// # Returns
    ///
    /// * `Ok(KineticaProvider)` - A new provider instance
    /// * `Err(GeoIndexError)` - If the base URL or table name is invalid, or
    ///   the HTTP client cannot be built
    pub fn new(config: GeoIndexConfig) -> Result<Self, GeoIndexError> {
        validate_table_name(&config.table_name)?;

        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| GeoIndexError::connection(format!("Invalid Kinetica URL: {}", e)))?;
        let execute_sql_url = Self::endpoint(&base, "execute/sql")?;
        let mut insert_records_url = Self::endpoint(&base, "insert/records/json")?;
        insert_records_url
            .query_pairs_mut()
            .append_pair("table_name", &config.table_name);

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GeoIndexError::connection(e.to_string()))?;

        info!(
            url = %base,
            table = %config.table_name,
            row_limit = config.row_limit,
            "Created Kinetica provider"
        );

        Ok(Self {
            client,
            config,
            execute_sql_url,
            insert_records_url,
        })
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url, GeoIndexError> {
        Url::parse(&format!("{}/{}", base.as_str().trim_end_matches('/'), path))
            .map_err(|e| GeoIndexError::connection(format!("Invalid Kinetica URL: {}", e)))
    }

    /// POST a JSON body and return the validated envelope payload.
    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &T,
        expected_data_type: &str,
    ) -> Result<String, GeoIndexError> {
        let response = self
            .client
            .post(url.clone())
            .header(header::AUTHORIZATION, &self.config.authorization)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // Kinetica reports failures inside the envelope; only fall back to the
        // HTTP status when the body is not an envelope at all.
        let envelope = ResponseEnvelope::parse(&bytes).map_err(|e| {
            if status.is_success() {
                e
            } else {
                GeoIndexError::upstream(format!("Kinetica returned HTTP {}", status))
            }
        })?;

        envelope.into_payload(expected_data_type)
    }
}

#[async_trait]
impl GeoIndexProvider for KineticaProvider {
    async fn find_nearby(
        &self,
        point: GeoLocation,
        max_distance_km: f64,
    ) -> Result<HashMap<String, f64>, GeoIndexError> {
        validate_radius(max_distance_km)?;
        point
            .validate()
            .map_err(|e| GeoIndexError::invalid_argument(e.to_string()))?;

        let statement = distance_statement(&self.config.table_name, point, max_distance_km * 1000.0);
        debug!(statement = %statement, "Querying Kinetica for nearby points");

        let request = ExecuteSqlRequest::new(statement, self.config.row_limit);
        let data_str = self
            .post(&self.execute_sql_url, &request, EXECUTE_SQL_DATA_TYPE)
            .await
            .map_err(|e| {
                error!(error = %e, "Kinetica radius query failed");
                e
            })?;

        let response = ExecuteSqlResponse::parse(&data_str)?;
        if response.has_more_records {
            warn!(
                row_limit = self.config.row_limit,
                total = response.total_number_of_records,
                "Radius query hit the row limit; candidate set is truncated"
            );
        }

        let table = ColumnarTable::parse(&response.json_encoded_response)?;
        let distances = table.key_value_pairs(KEY_COLUMN, DISTANCE_COLUMN)?;

        debug!(candidates = distances.len(), "Kinetica radius query returned");
        Ok(distances)
    }

    async fn register_point(&self, key: &Uuid, point: GeoLocation) -> Result<(), GeoIndexError> {
        point
            .validate()
            .map_err(|e| GeoIndexError::invalid_argument(e.to_string()))?;

        let request = InsertPointRequest {
            id: store_key_string(key),
            longitude: point.longitude,
            latitude: point.latitude,
        };

        self.post(&self.insert_records_url, &request, INSERT_RECORDS_DATA_TYPE)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to register point in Kinetica");
                e
            })?;

        debug!(key = %key, "Registered point in Kinetica");
        Ok(())
    }
}
