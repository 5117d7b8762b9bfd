//! Student data acquisition
//!
//! A [`StudentStore`] returns every row of the student table; [`load_data`] turns that into
//! the session's immutable [`BaseTable`]. Failures here are fatal to the session.

pub mod backends;
pub mod error;
pub mod factory;
pub mod traits;

pub use backends::{CsvStore, MemoryStore, SqlDialect, SqlStore};
pub use error::{StoreError, StoreResult};
pub use factory::StoreFactory;
pub use traits::StudentStore;

use std::time::Instant;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::model::BaseTable;

/// Fetch the complete student table once
///
/// No retries: connection and schema failures propagate to the caller.
pub async fn load_data(store: &dyn StudentStore) -> Result<BaseTable> {
    let started = Instant::now();
    info!("Loading student table from {}", store.describe());

    let rows = store
        .load_students()
        .await
        .map_err(|e| DashboardError::from(e).with_context(store.describe()))?;
    let table = BaseTable::new(rows)?;

    info!(
        "Loaded {} students in {:.2?}",
        table.len(),
        started.elapsed()
    );
    Ok(table)
}
