//! Session-scoped dashboard state
//!
//! A [`Session`] owns the base table fetched once at startup and lazily computes each
//! view's page on first request. Later requests for the same view reuse the cached page.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::BaseTable;
use crate::storage::{load_data, StudentStore};
use crate::views::{build_page, Page, View, ViewSettings};

/// One dashboard session
pub struct Session {
    table: BaseTable,
    settings: ViewSettings,
    source: String,
    loaded_at: DateTime<Utc>,
    pages: RwLock<HashMap<View, Arc<Page>>>,
    computed: AtomicUsize,
}

impl Session {
    /// Acquire the student table and start a session around it
    pub async fn open(store: &dyn StudentStore, settings: ViewSettings) -> Result<Self> {
        let table = load_data(store).await?;
        Ok(Self::from_table(table, settings, store.describe()))
    }

    /// Start a session over an already loaded table
    pub fn from_table(table: BaseTable, settings: ViewSettings, source: impl Into<String>) -> Self {
        let source = source.into();
        info!("Session started with {} students from {}", table.len(), source);
        Self {
            table,
            settings,
            source,
            loaded_at: Utc::now(),
            pages: RwLock::new(HashMap::new()),
            computed: AtomicUsize::new(0),
        }
    }

    /// The page of `view`, computed at most once per session
    pub async fn page(&self, view: View) -> Result<Arc<Page>> {
        if let Some(page) = self.pages.read().await.get(&view) {
            debug!("View {} served from cache", view);
            return Ok(Arc::clone(page));
        }

        let mut pages = self.pages.write().await;
        if let Some(page) = pages.get(&view) {
            return Ok(Arc::clone(page));
        }

        let page = Arc::new(build_page(view, &self.table, &self.settings)?);
        self.computed.fetch_add(1, Ordering::Relaxed);
        pages.insert(view, Arc::clone(&page));
        Ok(page)
    }

    pub fn table(&self) -> &BaseTable {
        &self.table
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of pages computed so far
    pub fn pages_computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::StudentRecord;
    use crate::storage::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            StudentRecord::new("1").with_province("Satun").with_faculty("Law"),
            StudentRecord::new("2").with_province("Satun").with_faculty("Arts"),
            StudentRecord::new("3").with_province("Phuket").with_faculty("Law"),
        ])
    }

    #[tokio::test]
    async fn test_pages_are_memoized() {
        let session = Session::open(&store(), ViewSettings::default()).await.unwrap();
        assert_eq!(session.table().len(), 3);

        let first = session.page(View::ProvinceSummary).await.unwrap();
        let second = session.page(View::ProvinceSummary).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.pages_computed(), 1);

        session.page(View::FacultySummary).await.unwrap();
        assert_eq!(session.pages_computed(), 2);
    }

    #[tokio::test]
    async fn test_open_fails_when_store_is_unreachable() {
        let err = Session::open(&MemoryStore::unreachable(), ViewSettings::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), ErrorCode::STORAGE_CONNECTION);
    }

    #[tokio::test]
    async fn test_concurrent_requests_compute_once() {
        let session = Arc::new(Session::open(&store(), ViewSettings::default()).await.unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.page(View::BasicStatistics).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(session.pages_computed(), 1);
    }
}
