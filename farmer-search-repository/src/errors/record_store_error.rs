//! Record store error types.

use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur within the record store.
///
/// Consolidates database failures (via SQLx), referential failures and the
/// defensive write-count checks performed after every insert.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Farmer not found: {0}")]
    FarmerNotFound(Uuid),

    #[error("Expected {expected} inserted records, got {actual}")]
    WriteCountMismatch { expected: usize, actual: usize },
}

impl RecordStoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    pub fn write_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::WriteCountMismatch { expected, actual }
    }
}
