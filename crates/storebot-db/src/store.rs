//! [`PageStore`] backed by the `page_contents` table.

use async_trait::async_trait;
use sqlx::PgPool;
use storebot_core::{PageDraft, PageRecord, PageStore, PageType, StoreError, UpsertOutcome};

use crate::pages::{
    count_pages, delete_all_pages, list_active_pages, list_active_pages_by_type,
    rows_into_records, upsert_page,
};
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidRow { url, reason } => StoreError::Corrupt { url, reason },
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn active_pages(&self) -> Result<Vec<PageRecord>, StoreError> {
        let rows = list_active_pages(&self.pool).await?;
        Ok(rows_into_records(rows)?)
    }

    async fn active_pages_of_type(
        &self,
        page_type: PageType,
    ) -> Result<Vec<PageRecord>, StoreError> {
        let rows = list_active_pages_by_type(&self.pool, page_type).await?;
        Ok(rows_into_records(rows)?)
    }

    async fn upsert(&self, draft: &PageDraft) -> Result<UpsertOutcome, StoreError> {
        let created = upsert_page(&self.pool, draft).await?;
        Ok(if created {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        Ok(delete_all_pages(&self.pool).await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(count_pages(&self.pool).await?)
    }
}
