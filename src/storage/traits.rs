//! Core trait for student data sources

use async_trait::async_trait;

use super::error::StoreResult;
use crate::model::StudentRecord;

/// A read-only source of the complete student table
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Fetch every row of the student table in store order
    async fn load_students(&self) -> StoreResult<Vec<StudentRecord>>;

    /// Human-readable description of the source, safe to log
    fn describe(&self) -> String;
}
