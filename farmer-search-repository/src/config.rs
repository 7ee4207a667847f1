//! Configuration types for the gateway implementations.

use std::time::Duration;

/// Connect timeout applied to every gateway call.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on rows returned by a single radius query.
pub const DEFAULT_ROW_LIMIT: usize = 100;

/// Default name of the geo-index table mirroring farmer locations.
pub const DEFAULT_GEO_TABLE: &str = "farmers";

/// Configuration for the Kinetica geo-index provider.
#[derive(Clone)]
pub struct GeoIndexConfig {
    /// Base URL of the Kinetica REST endpoint (e.g. "https://host:8082/gpudb-0").
    pub base_url: String,
    /// Opaque value sent verbatim in the `Authorization` header.
    pub authorization: String,
    /// Table holding `(id, longitude, latitude)` rows.
    pub table_name: String,
    /// Maximum number of rows requested per radius query.
    ///
    /// Candidates beyond the limit are silently dropped; there is no paging.
    pub row_limit: usize,
    /// Connect timeout of the HTTP client.
    pub connect_timeout: Duration,
}

impl GeoIndexConfig {
    /// Create a config with the default table, row limit and timeout.
    pub fn new(base_url: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            authorization: authorization.into(),
            table_name: DEFAULT_GEO_TABLE.to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

// Keeps the authorization value out of logs.
impl std::fmt::Debug for GeoIndexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoIndexConfig")
            .field("base_url", &self.base_url)
            .field("authorization", &"<redacted>")
            .field("table_name", &self.table_name)
            .field("row_limit", &self.row_limit)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Configuration for the PostgreSQL record store.
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// How long a call may wait for a connection before failing.
    pub connect_timeout: Duration,
    /// Upper bound on concurrently open connections.
    pub max_connections: u32,
}

impl RecordStoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_connections: 10,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}
