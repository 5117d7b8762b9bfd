//! Store factory for creating student sources

use super::backends::{CsvStore, SqlStore};
use super::error::{StoreError, StoreResult};
use super::traits::StudentStore;
use crate::config::{DashboardConfig, SourceKind};

/// Factory for creating stores
pub struct StoreFactory;

impl StoreFactory {
    /// Create the store selected by the configuration
    pub async fn from_config(config: &DashboardConfig) -> StoreResult<Box<dyn StudentStore>> {
        match config.source.kind {
            SourceKind::Database => {
                let store = SqlStore::connect(&config.database).await?;
                Ok(Box::new(store))
            }
            SourceKind::Csv => {
                let path = config.source.csv_path.as_ref().ok_or_else(|| {
                    StoreError::configuration("CSV source selected without a csv_path")
                })?;
                Ok(Box::new(CsvStore::new(path, config.database.columns.clone())))
            }
        }
    }
}
