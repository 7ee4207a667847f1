//! Request bodies sent to Kinetica.

use farmer_search_shared::GeoLocation;
use serde::Serialize;

use crate::errors::GeoIndexError;

/// Header name of the key column selected by the distance statement.
pub const KEY_COLUMN: &str = "id";

/// Header name of the distance column selected by the distance statement.
pub const DISTANCE_COLUMN: &str = "distance_m";

/// Body of an `/execute/sql` request.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteSqlRequest {
    pub statement: String,
    pub offset: usize,
    pub limit: usize,
    pub encoding: &'static str,
}

impl ExecuteSqlRequest {
    /// A JSON-encoded, first-page query capped at `limit` rows.
    pub fn new(statement: String, limit: usize) -> Self {
        Self {
            statement,
            offset: 0,
            limit,
            encoding: "json",
        }
    }
}

/// Body of an `/insert/records/json` request: one geo-index row.
#[derive(Debug, Clone, Serialize)]
pub struct InsertPointRequest {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Validate a table name before it is interpolated into a statement.
///
/// Table names must contain only alphanumeric characters, underscores, and
/// at most one dot separating a schema from the table.
pub fn validate_table_name(table: &str) -> Result<(), GeoIndexError> {
    let parts: Vec<&str> = table.split('.').collect();
    let valid = parts.len() <= 2
        && parts.iter().all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if !valid {
        return Err(GeoIndexError::invalid_argument(format!(
            "Table name '{}' contains invalid characters. Only alphanumeric characters and underscores are allowed",
            table
        )));
    }
    Ok(())
}

/// Build the radius query statement.
///
/// Selects the key and the distance (metres) of every point strictly closer
/// than `max_distance_m` to `point`. Coordinates and distance are rendered
/// with 14 decimal places.
pub fn distance_statement(table: &str, point: GeoLocation, max_distance_m: f64) -> String {
    let geodist = format!(
        "GEODIST({table}.longitude, {table}.latitude, {lon:.14}, {lat:.14})",
        table = table,
        lon = point.longitude,
        lat = point.latitude,
    );
    format!(
        "SELECT {key}, {geodist} AS {distance} FROM {table} WHERE {geodist} < {max:.14};",
        key = KEY_COLUMN,
        geodist = geodist,
        distance = DISTANCE_COLUMN,
        table = table,
        max = max_distance_m,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_statement() {
        let statement = distance_statement("farmers", GeoLocation::new(13.5, -52.25), 50_000.0);
        assert_eq!(
            statement,
            "SELECT id, GEODIST(farmers.longitude, farmers.latitude, 13.50000000000000, -52.25000000000000) AS distance_m \
             FROM farmers WHERE GEODIST(farmers.longitude, farmers.latitude, 13.50000000000000, -52.25000000000000) < 50000.00000000000000;"
        );
    }

    #[test]
    fn test_execute_sql_request_body() {
        let request = ExecuteSqlRequest::new("SELECT 1;".to_string(), 100);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statement": "SELECT 1;",
                "offset": 0,
                "limit": 100,
                "encoding": "json"
            })
        );
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("farmers").is_ok());
        assert!(validate_table_name("ki_home.farmers").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("farmers; DROP TABLE farmers").is_err());
        assert!(validate_table_name("a.b.c").is_err());
        assert!(validate_table_name("farmers.").is_err());
    }
}
