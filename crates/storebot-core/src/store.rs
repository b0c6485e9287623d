//! Storage abstraction for scraped pages.
//!
//! The chat engine and the scrape pipeline only talk to a [`PageStore`], so
//! the Postgres backend (in `storebot-db`) and [`InMemoryPageStore`] are
//! interchangeable.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::pages::{PageDraft, PageRecord, PageType};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page store backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("corrupt page record for {url}: {reason}")]
    Corrupt { url: String, reason: String },

    #[error("in-memory page store lock poisoned")]
    Poisoned,
}

/// Whether an upsert inserted a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Read-mostly collection of scraped pages keyed by URL.
///
/// Listing operations return only active pages, most recently scraped first.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn active_pages(&self) -> Result<Vec<PageRecord>, StoreError>;

    async fn active_pages_of_type(
        &self,
        page_type: PageType,
    ) -> Result<Vec<PageRecord>, StoreError>;

    /// Inserts or refreshes the page identified by `draft.url`.
    async fn upsert(&self, draft: &PageDraft) -> Result<UpsertOutcome, StoreError>;

    /// Removes every page. Returns the number of rows deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Counts every stored page, active or not.
    async fn count(&self) -> Result<i64, StoreError>;
}

/// `Vec`-backed [`PageStore`] for tests and offline use.
#[derive(Debug, Default)]
pub struct InMemoryPageStore {
    pages: RwLock<Vec<PageRecord>>,
}

impl InMemoryPageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with pre-built records, keeping their flags and timestamps.
    #[must_use]
    pub fn with_pages(pages: Vec<PageRecord>) -> Self {
        Self {
            pages: RwLock::new(pages),
        }
    }

    /// Flips the soft-delete flag. Returns `false` when the URL is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a writer panicked while holding the lock.
    pub fn set_active(&self, url: &str, is_active: bool) -> Result<bool, StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        Ok(pages
            .iter_mut()
            .find(|p| p.url == url)
            .map(|p| p.is_active = is_active)
            .is_some())
    }

    fn snapshot<F>(&self, keep: F) -> Result<Vec<PageRecord>, StoreError>
    where
        F: Fn(&PageRecord) -> bool,
    {
        let pages = self.pages.read().map_err(|_| StoreError::Poisoned)?;
        let mut selected: Vec<PageRecord> = pages.iter().filter(|p| keep(p)).cloned().collect();
        selected.sort_by(|a, b| b.last_scraped.cmp(&a.last_scraped));
        Ok(selected)
    }
}

#[async_trait]
impl PageStore for InMemoryPageStore {
    async fn active_pages(&self) -> Result<Vec<PageRecord>, StoreError> {
        self.snapshot(|p| p.is_active)
    }

    async fn active_pages_of_type(
        &self,
        page_type: PageType,
    ) -> Result<Vec<PageRecord>, StoreError> {
        self.snapshot(|p| p.is_active && p.page_type == page_type)
    }

    async fn upsert(&self, draft: &PageDraft) -> Result<UpsertOutcome, StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        let record = draft.clone().into_record(Utc::now());

        if let Some(existing) = pages.iter_mut().find(|p| p.url == draft.url) {
            *existing = record;
            return Ok(UpsertOutcome::Updated);
        }

        pages.push(record);
        Ok(UpsertOutcome::Created)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        let removed = pages.len() as u64;
        pages.clear();
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let pages = self.pages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(i64::try_from(pages.len()).unwrap_or(i64::MAX))
    }
}
