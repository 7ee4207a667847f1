//! Error types for the farmer search repository.
//!
//! Each gateway has its own error type so callers can tell an upstream
//! geo-index failure apart from a record store failure.

mod geo_index_error;
mod record_store_error;

pub use geo_index_error::GeoIndexError;
pub use record_store_error::RecordStoreError;
