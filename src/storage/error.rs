//! Error types for student data acquisition

use std::fmt;
use thiserror::Error;

use crate::error::{DashboardError, ErrorCode};

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Acquisition failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing store unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// Expected table or column absent
    #[error("Schema error: {0}")]
    Schema(String),

    /// Rows violate the identifier invariant
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Query failed for another reason
    #[error("Query error: {0}")]
    Query(String),

    /// Store settings are unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// Create a connection error
    pub fn connection<E: fmt::Display>(msg: E) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create a schema error
    pub fn schema<E: fmt::Display>(msg: E) -> Self {
        Self::Schema(msg.to_string())
    }

    /// Create an integrity error
    pub fn integrity<E: fmt::Display>(msg: E) -> Self {
        Self::Integrity(msg.to_string())
    }

    /// Create a query error
    pub fn query<E: fmt::Display>(msg: E) -> Self {
        Self::Query(msg.to_string())
    }

    /// Create a configuration error
    pub fn configuration<E: fmt::Display>(msg: E) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Convert StoreError to DashboardError
impl From<StoreError> for DashboardError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::Connection(_) => ErrorCode::STORAGE_CONNECTION,
            StoreError::Schema(_) => ErrorCode::STORAGE_SCHEMA,
            StoreError::Integrity(_) => ErrorCode::STORAGE_INTEGRITY,
            StoreError::Query(_) => ErrorCode::STORAGE_QUERY,
            StoreError::Configuration(_) => ErrorCode::STORAGE_CONFIGURATION,
            StoreError::Io(_) => ErrorCode::STORAGE_IO_ERROR,
            StoreError::Csv(_) => ErrorCode::STORAGE_CSV_ERROR,
        };

        DashboardError::storage_with_code(code, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_codes() {
        let err: DashboardError = StoreError::connection("refused").into();
        assert_eq!(err.code(), ErrorCode::STORAGE_CONNECTION);
        assert_eq!(err.exit_code(), 3);

        let err: DashboardError = StoreError::schema("no such table: student_list").into();
        assert_eq!(err.code(), ErrorCode::STORAGE_SCHEMA);
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        let dash: DashboardError = err.into();
        assert_eq!(dash.code(), ErrorCode::STORAGE_IO_ERROR);
    }
}
