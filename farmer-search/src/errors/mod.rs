//! Error types for the farmer search core.
//!
//! Gateway errors are folded into a single taxonomy at this level. The
//! excluded HTTP layer only has to look at [`CatalogError::is_client_error`]
//! to choose between a client-error and a server-error response.

use farmer_search_repository::{GeoIndexError, RecordStoreError};
use farmer_search_shared::{IdError, ValidationError};
use thiserror::Error;

use crate::saga::{SagaCursor, SagaStep};

/// Errors returned by the proximity join engine and the catalog manager.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed identifier, non-positive distance, or invalid record content.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The geo index is unreachable or answered with something unexpected.
    #[error("Geo index error: {0}")]
    Upstream(GeoIndexError),

    /// The record store is unreachable, a write count did not match, or a
    /// reference did not resolve.
    #[error("Record store error: {0}")]
    Store(RecordStoreError),

    /// A postcondition failed on inputs that looked correct.
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// A multi-step mutation stopped after at least one step had been applied.
    ///
    /// Nothing was rolled back. The cursor says which steps are in effect so
    /// the inconsistency can be repaired out of band.
    #[error("{cursor} stopped at {failed_step}: {source}")]
    IncompleteMutation {
        cursor: SagaCursor,
        failed_step: SagaStep,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an internal inconsistency error.
    pub fn internal_inconsistency(msg: impl Into<String>) -> Self {
        Self::InternalInconsistency(msg.into())
    }

    /// Whether the caller is at fault.
    ///
    /// Only `InvalidArgument` is a client error; everything else is reported
    /// as a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<GeoIndexError> for CatalogError {
    fn from(err: GeoIndexError) -> Self {
        match err {
            GeoIndexError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::Upstream(other),
        }
    }
}

impl From<RecordStoreError> for CatalogError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::Store(other),
        }
    }
}

impl From<IdError> for CatalogError {
    fn from(err: IdError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmer_search_shared::{decode_id, RecordKind};
    use uuid::Uuid;

    #[test]
    fn test_gateway_errors_map_to_taxonomy() {
        let err: CatalogError = GeoIndexError::invalid_argument("radius").into();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));

        let err: CatalogError = GeoIndexError::upstream("status ERROR").into();
        assert!(matches!(err, CatalogError::Upstream(_)));

        let err: CatalogError = RecordStoreError::invalid_argument("bad key").into();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));

        let err: CatalogError = RecordStoreError::FarmerNotFound(Uuid::nil()).into();
        assert!(matches!(err, CatalogError::Store(_)));

        let err: CatalogError = RecordStoreError::write_count_mismatch(1, 0).into();
        assert!(matches!(err, CatalogError::Store(_)));
    }

    #[test]
    fn test_decode_failure_is_client_error() {
        let err: CatalogError = decode_id(RecordKind::Farmer, "p-123").unwrap_err().into();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_only_invalid_argument_is_client_error() {
        assert!(CatalogError::invalid_argument("x").is_client_error());
        assert!(!CatalogError::internal_inconsistency("x").is_client_error());
        assert!(!CatalogError::Upstream(GeoIndexError::connection("down")).is_client_error());
        assert!(!CatalogError::Store(RecordStoreError::connection("down")).is_client_error());
    }
}
