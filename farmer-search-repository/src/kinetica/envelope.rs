//! Kinetica response decoding.
//!
//! Every Kinetica endpoint answers with the same envelope. For SQL queries the
//! envelope's `data_str` holds another JSON document whose
//! `json_encoded_response` is, once more, a JSON string: a column-oriented
//! table of the form
//!
//! ```json
//! { "column_headers": ["id", "distance_m"], "column_1": ["..."], "column_2": [12.5] }
//! ```
//!
//! Column `column_{i+1}` holds the values of header `i`. Which column a
//! selected field lands in depends on the statement, so columns are always
//! looked up by header name.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::GeoIndexError;

/// Status value of a successful response.
pub const STATUS_OK: &str = "OK";

/// Data type tag of an `/execute/sql` response.
pub const EXECUTE_SQL_DATA_TYPE: &str = "execute_sql_response";

/// Data type tag of an `/insert/records/json` response.
pub const INSERT_RECORDS_DATA_TYPE: &str = "insert_records_from_payload_response";

/// Generic response envelope shared by all Kinetica endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub data_str: String,
}

impl ResponseEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, GeoIndexError> {
        serde_json::from_slice(body).map_err(|e| {
            GeoIndexError::payload(format!("Kinetica response is not a valid envelope: {}", e))
        })
    }

    /// Check status and data type, returning the embedded payload string.
    pub fn into_payload(self, expected_data_type: &str) -> Result<String, GeoIndexError> {
        if self.status != STATUS_OK {
            return Err(GeoIndexError::upstream(format!(
                "Kinetica response status is {} (expected {}): {}",
                self.status, STATUS_OK, self.message
            )));
        }
        if self.data_type != expected_data_type {
            return Err(GeoIndexError::upstream(format!(
                "Kinetica response data_type is {} (expected {}): {}",
                self.data_type, expected_data_type, self.message
            )));
        }
        Ok(self.data_str)
    }
}

/// Payload of an `/execute/sql` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteSqlResponse {
    #[serde(default)]
    pub count_affected: i64,
    #[serde(default)]
    pub response_schema_str: String,
    #[serde(default)]
    pub binary_encoded_response: String,
    #[serde(default)]
    pub json_encoded_response: String,
    #[serde(default)]
    pub total_number_of_records: i64,
    #[serde(default)]
    pub has_more_records: bool,
    #[serde(default)]
    pub paging_table: String,
    #[serde(default)]
    pub info: HashMap<String, String>,
}

impl ExecuteSqlResponse {
    pub fn parse(data_str: &str) -> Result<Self, GeoIndexError> {
        serde_json::from_str(data_str).map_err(|e| {
            GeoIndexError::payload(format!("execute_sql_response payload is malformed: {}", e))
        })
    }
}

/// A decoded column-oriented result table.
#[derive(Debug, Clone)]
pub struct ColumnarTable {
    columns: HashMap<String, Vec<Value>>,
    row_count: usize,
}

impl ColumnarTable {
    /// Decode the `json_encoded_response` string.
    ///
    /// Every header must have a matching `column_{n}` array and all columns
    /// must have the same length.
    pub fn parse(json_encoded_response: &str) -> Result<Self, GeoIndexError> {
        let mut raw: Map<String, Value> = serde_json::from_str(json_encoded_response)
            .map_err(|e| GeoIndexError::payload(format!("columnar table is malformed: {}", e)))?;

        let headers = match raw.remove("column_headers") {
            Some(Value::Array(headers)) => headers,
            Some(_) => {
                return Err(GeoIndexError::payload(
                    "column_headers is not an array".to_string(),
                ))
            }
            None => return Err(GeoIndexError::payload("column_headers is missing".to_string())),
        };

        let mut columns = HashMap::with_capacity(headers.len());
        let mut row_count: Option<usize> = None;

        for (index, header) in headers.into_iter().enumerate() {
            let name = match header {
                Value::String(name) => name,
                other => {
                    return Err(GeoIndexError::payload(format!(
                        "column header {} is not a string: {}",
                        index, other
                    )))
                }
            };

            let positional = format!("column_{}", index + 1);
            let values = match raw.remove(&positional) {
                Some(Value::Array(values)) => values,
                Some(_) => {
                    return Err(GeoIndexError::payload(format!(
                        "{} ('{}') is not an array",
                        positional, name
                    )))
                }
                None => {
                    return Err(GeoIndexError::payload(format!(
                        "{} ('{}') is missing",
                        positional, name
                    )))
                }
            };

            match row_count {
                Some(expected) if expected != values.len() => {
                    return Err(GeoIndexError::payload(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        values.len(),
                        expected
                    )));
                }
                _ => row_count = Some(values.len()),
            }

            if columns.insert(name.clone(), values).is_some() {
                return Err(GeoIndexError::payload(format!(
                    "column header '{}' appears twice",
                    name
                )));
            }
        }

        Ok(Self {
            columns,
            row_count: row_count.unwrap_or(0),
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Values of the column with header `name`.
    pub fn column(&self, name: &str) -> Result<&[Value], GeoIndexError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GeoIndexError::payload(format!("column '{}' is missing", name)))
    }

    /// Zip a string key column with a numeric value column.
    pub fn key_value_pairs(
        &self,
        key_column: &str,
        value_column: &str,
    ) -> Result<HashMap<String, f64>, GeoIndexError> {
        let keys = self.column(key_column)?;
        let values = self.column(value_column)?;

        keys.iter()
            .zip(values)
            .enumerate()
            .map(|(row, (key, value))| -> Result<(String, f64), GeoIndexError> {
                let key = key.as_str().ok_or_else(|| {
                    GeoIndexError::payload(format!(
                        "row {}: '{}' is not a string: {}",
                        row, key_column, key
                    ))
                })?;
                let value = value.as_f64().ok_or_else(|| {
                    GeoIndexError::payload(format!(
                        "row {}: '{}' is not a number: {}",
                        row, value_column, value
                    ))
                })?;
                Ok((key.to_string(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(status: &str, data_type: &str, data_str: &str) -> Vec<u8> {
        let message = if status == STATUS_OK {
            ""
        } else {
            "table 'farmers' does not exist"
        };
        serde_json::to_vec(&json!({
            "status": status,
            "message": message,
            "data_type": data_type,
            "data": "",
            "data_str": data_str,
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_success() {
        let body = envelope("OK", EXECUTE_SQL_DATA_TYPE, "{}");
        let payload = ResponseEnvelope::parse(&body)
            .unwrap()
            .into_payload(EXECUTE_SQL_DATA_TYPE)
            .unwrap();
        assert_eq!(payload, "{}");
    }

    #[test]
    fn test_envelope_error_status_carries_message() {
        let body = envelope("ERROR", "none", "");
        let err = ResponseEnvelope::parse(&body)
            .unwrap()
            .into_payload(EXECUTE_SQL_DATA_TYPE)
            .unwrap_err();
        match err {
            GeoIndexError::UpstreamError(msg) => {
                assert!(msg.contains("ERROR"));
                assert!(msg.contains("table 'farmers' does not exist"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_wrong_data_type() {
        let body = envelope("OK", INSERT_RECORDS_DATA_TYPE, "{}");
        let err = ResponseEnvelope::parse(&body)
            .unwrap()
            .into_payload(EXECUTE_SQL_DATA_TYPE)
            .unwrap_err();
        assert!(matches!(err, GeoIndexError::UpstreamError(_)));
    }

    #[test]
    fn test_envelope_not_json() {
        let err = ResponseEnvelope::parse(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GeoIndexError::PayloadError(_)));
    }

    #[test]
    fn test_execute_sql_response_fields() {
        let data_str = json!({
            "count_affected": 0,
            "response_schema_str": "",
            "binary_encoded_response": "",
            "json_encoded_response": "{\"column_headers\":[],\"column_datatypes\":[]}",
            "total_number_of_records": 2,
            "has_more_records": true,
            "paging_table": "",
            "info": { "count": "2" }
        })
        .to_string();

        let response = ExecuteSqlResponse::parse(&data_str).unwrap();
        assert_eq!(response.total_number_of_records, 2);
        assert!(response.has_more_records);
        assert_eq!(response.info.get("count").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_columnar_table_decodes_by_header_name() {
        let table = ColumnarTable::parse(
            &json!({
                "column_headers": ["id", "distance_m"],
                "column_1": ["a", "b"],
                "column_2": [120.5, 3000.0],
            })
            .to_string(),
        )
        .unwrap();

        let pairs = table.key_value_pairs("id", "distance_m").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(pairs["a"], 120.5);
        assert_eq!(pairs["b"], 3000.0);
    }

    #[test]
    fn test_columnar_table_swapped_column_order() {
        let table = ColumnarTable::parse(
            &json!({
                "column_headers": ["distance_m", "id"],
                "column_1": [42.0],
                "column_2": ["a"],
            })
            .to_string(),
        )
        .unwrap();

        let pairs = table.key_value_pairs("id", "distance_m").unwrap();
        assert_eq!(pairs["a"], 42.0);
    }

    #[test]
    fn test_columnar_table_ignores_extra_fields() {
        let table = ColumnarTable::parse(
            &json!({
                "column_headers": ["id", "distance_m"],
                "column_datatypes": ["char32", "double"],
                "column_1": [],
                "column_2": [],
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.key_value_pairs("id", "distance_m").unwrap().is_empty());
    }

    #[test]
    fn test_columnar_table_missing_column() {
        let err = ColumnarTable::parse(
            &json!({ "column_headers": ["id", "distance_m"], "column_1": ["a"] }).to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, GeoIndexError::PayloadError(_)));

        let table = ColumnarTable::parse(
            &json!({ "column_headers": ["id"], "column_1": ["a"] }).to_string(),
        )
        .unwrap();
        assert!(table.key_value_pairs("id", "distance_m").is_err());
    }

    #[test]
    fn test_columnar_table_ragged_columns() {
        let err = ColumnarTable::parse(
            &json!({
                "column_headers": ["id", "distance_m"],
                "column_1": ["a", "b"],
                "column_2": [1.0],
            })
            .to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, GeoIndexError::PayloadError(_)));
    }

    #[test]
    fn test_columnar_table_wrong_cell_types() {
        let table = ColumnarTable::parse(
            &json!({
                "column_headers": ["id", "distance_m"],
                "column_1": [7],
                "column_2": ["far"],
            })
            .to_string(),
        )
        .unwrap();
        assert!(matches!(
            table.key_value_pairs("id", "distance_m"),
            Err(GeoIndexError::PayloadError(_))
        ));
    }
}
