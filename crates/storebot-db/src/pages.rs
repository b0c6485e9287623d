//! Database operations for `page_contents`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storebot_core::{PageDraft, PageRecord, PageType};

use crate::DbError;

const PAGE_COLUMNS: &str = "url, title, content, page_type, is_active, last_scraped";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `page_contents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PageRow {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    /// One of `product`, `collection`, `page` (enforced by a CHECK constraint).
    pub page_type: String,
    pub is_active: bool,
    pub last_scraped: DateTime<Utc>,
}

impl TryFrom<PageRow> for PageRecord {
    type Error = DbError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let page_type = row
            .page_type
            .parse::<PageType>()
            .map_err(|e| DbError::InvalidRow {
                url: row.url.clone(),
                reason: e.to_string(),
            })?;

        Ok(PageRecord {
            url: row.url,
            title: row.title,
            content: row.content,
            page_type,
            is_active: row.is_active,
            last_scraped: row.last_scraped,
        })
    }
}

/// Row count for one page type.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PageTypeCount {
    pub page_type: String,
    pub total: i64,
    pub active: i64,
}

/// Outcome of [`reclassify_page_types`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclassifySummary {
    /// Rows whose `page_type` changed.
    pub updated: u64,
    /// Per-type counts after the repair.
    pub counts: Vec<PageTypeCount>,
}

impl ReclassifySummary {
    #[must_use]
    pub fn count_for(&self, page_type: PageType) -> i64 {
        self.counts
            .iter()
            .find(|c| c.page_type == page_type.as_str())
            .map_or(0, |c| c.total)
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Upserts a page by URL, marking it active and stamping `last_scraped`.
///
/// Returns `true` when the row was newly inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_page(pool: &PgPool, draft: &PageDraft) -> Result<bool, DbError> {
    // xmax is zero only for a row version created by INSERT.
    let inserted = sqlx::query_scalar::<_, bool>(
        "INSERT INTO page_contents \
             (url, title, content, page_type, is_active, last_scraped) \
         VALUES ($1, $2, $3, $4, TRUE, NOW()) \
         ON CONFLICT (url) DO UPDATE SET \
             title        = EXCLUDED.title, \
             content      = EXCLUDED.content, \
             page_type    = EXCLUDED.page_type, \
             is_active    = TRUE, \
             last_scraped = NOW() \
         RETURNING (xmax = 0)",
    )
    .bind(&draft.url)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(draft.page_type.as_str())
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// Deletes every page. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_all_pages(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM page_contents")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Sets the soft-delete flag on one page.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no page has this URL, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_page_active(pool: &PgPool, url: &str, is_active: bool) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE page_contents SET is_active = $2 WHERE url = $1")
        .bind(url)
        .bind(is_active)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Recomputes `page_type` from each URL: `/products/` wins, then
/// `/collections/`, everything else is a plain page.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update or the follow-up count fails.
pub async fn reclassify_page_types(pool: &PgPool) -> Result<ReclassifySummary, DbError> {
    let result = sqlx::query(
        "UPDATE page_contents SET page_type = derived.page_type \
         FROM ( \
             SELECT id, \
                    CASE \
                        WHEN url LIKE '%/products/%'    THEN 'product' \
                        WHEN url LIKE '%/collections/%' THEN 'collection' \
                        ELSE 'page' \
                    END AS page_type \
             FROM page_contents \
         ) AS derived \
         WHERE page_contents.id = derived.id \
           AND page_contents.page_type <> derived.page_type",
    )
    .execute(pool)
    .await?;

    let counts = count_pages_by_type(pool).await?;

    Ok(ReclassifySummary {
        updated: result.rows_affected(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Active pages, most recently scraped first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_pages(pool: &PgPool) -> Result<Vec<PageRow>, DbError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "SELECT {PAGE_COLUMNS} FROM page_contents \
         WHERE is_active = TRUE \
         ORDER BY last_scraped DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Active pages of one type, most recently scraped first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_pages_by_type(
    pool: &PgPool,
    page_type: PageType,
) -> Result<Vec<PageRow>, DbError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "SELECT {PAGE_COLUMNS} FROM page_contents \
         WHERE is_active = TRUE AND page_type = $1 \
         ORDER BY last_scraped DESC, id DESC"
    ))
    .bind(page_type.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Pages of any activity state, optionally filtered by type, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pages(
    pool: &PgPool,
    page_type: Option<PageType>,
    limit: i64,
) -> Result<Vec<PageRow>, DbError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "SELECT {PAGE_COLUMNS} FROM page_contents \
         WHERE ($1::TEXT IS NULL OR page_type = $1) \
         ORDER BY last_scraped DESC, id DESC \
         LIMIT $2"
    ))
    .bind(page_type.map(PageType::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Counts every page, active or not.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_pages(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM page_contents")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Per-type totals, ordered `product`, `collection`, `page`. Types with no rows
/// are omitted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_pages_by_type(pool: &PgPool) -> Result<Vec<PageTypeCount>, DbError> {
    let rows = sqlx::query_as::<_, PageTypeCount>(
        "SELECT page_type, \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE is_active) AS active \
         FROM page_contents \
         GROUP BY page_type \
         ORDER BY CASE page_type \
                      WHEN 'product'    THEN 0 \
                      WHEN 'collection' THEN 1 \
                      ELSE 2 \
                  END",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Converts rows into domain records, failing on the first corrupt row.
///
/// # Errors
///
/// Returns [`DbError::InvalidRow`] if a row carries an unknown page type.
pub fn rows_into_records(rows: Vec<PageRow>) -> Result<Vec<PageRecord>, DbError> {
    rows.into_iter().map(PageRecord::try_from).collect()
}
