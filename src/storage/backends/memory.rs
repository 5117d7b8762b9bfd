//! In-memory student store for testing

use async_trait::async_trait;
use std::sync::Arc;

use crate::model::StudentRecord;
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::StudentStore;

/// In-memory student store for testing
///
/// An optional injected failure is returned instead of the rows, so that acquisition
/// errors can be exercised without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Vec<StudentRecord>>,
    failure: Option<FailureKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    Connection,
    Schema,
}

impl MemoryStore {
    /// Create a store serving `rows`
    pub fn new(rows: Vec<StudentRecord>) -> Self {
        Self {
            rows: Arc::new(rows),
            failure: None,
        }
    }

    /// A store whose every load fails as if the database were unreachable
    pub fn unreachable() -> Self {
        Self {
            rows: Arc::default(),
            failure: Some(FailureKind::Connection),
        }
    }

    /// A store whose every load fails as if the table were missing
    pub fn missing_table() -> Self {
        Self {
            rows: Arc::default(),
            failure: Some(FailureKind::Schema),
        }
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn load_students(&self) -> StoreResult<Vec<StudentRecord>> {
        match self.failure {
            Some(FailureKind::Connection) => {
                Err(StoreError::connection("memory store marked unreachable"))
            }
            Some(FailureKind::Schema) => Err(StoreError::schema("memory store has no student table")),
            None => Ok(self.rows.as_ref().clone()),
        }
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_returns_rows_in_order() {
        let store = MemoryStore::new(vec![StudentRecord::new("b"), StudentRecord::new("a")]);
        let rows = store.load_students().await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.describe(), "memory (2 rows)");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        assert!(MemoryStore::unreachable()
            .load_students()
            .await
            .unwrap_err()
            .is_connection());
        assert!(MemoryStore::missing_table()
            .load_students()
            .await
            .unwrap_err()
            .is_schema());
    }
}
