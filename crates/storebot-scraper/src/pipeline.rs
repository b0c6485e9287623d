//! Full scrape run: products, collections, and the homepage into a [`PageStore`].

use storebot_core::{PageDraft, PageStore, UpsertOutcome};

use crate::client::{extract_store_origin, ShopifyClient};
use crate::error::ScraperError;
use crate::normalize::{collection_draft, homepage_draft, product_draft};

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Storefront root; also the URL of the homepage record.
    pub store_url: String,
    pub store_name: String,
    /// Maximum number of products saved.
    pub limit: usize,
    /// Delete every stored page before saving.
    pub clear: bool,
    pub page_size: u32,
    pub inter_request_delay_ms: u64,
}

impl ScrapeOptions {
    #[must_use]
    pub fn from_app_config(config: &storebot_core::AppConfig) -> Self {
        Self {
            store_url: config.store_url.clone(),
            store_name: config.store_name.clone(),
            limit: config.scrape_limit,
            clear: false,
            page_size: config.scraper_page_size,
            inter_request_delay_ms: config.scraper_inter_request_delay_ms,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Pages saved, created or updated.
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    /// Products saved.
    pub products: usize,
    /// Collections saved.
    pub collections: usize,
    /// Rows removed by `clear`.
    pub cleared: u64,
    /// Items skipped because they could not be normalized or saved.
    pub failed: usize,
}

impl ScrapeSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        self.processed += 1;
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// Scrapes the configured store into `store`.
///
/// Per-item failures are logged and counted in [`ScrapeSummary::failed`]. A
/// failed collections request is logged and treated as an empty collection
/// list.
///
/// # Errors
///
/// Returns [`ScraperError`] if clearing the store or crawling
/// `products.json` fails.
pub async fn scrape_store(
    client: &ShopifyClient,
    store: &dyn PageStore,
    options: &ScrapeOptions,
) -> Result<ScrapeSummary, ScraperError> {
    let mut summary = ScrapeSummary::default();
    let origin = extract_store_origin(&options.store_url);

    if options.clear {
        summary.cleared = store.delete_all().await?;
        tracing::warn!(deleted = summary.cleared, "cleared stored pages before scrape");
    }

    tracing::info!(store_url = %options.store_url, limit = options.limit, "scraping products");
    let products = client
        .fetch_all_products(
            &options.store_url,
            options.page_size,
            options.inter_request_delay_ms,
            Some(options.limit),
        )
        .await?;
    if products.is_empty() {
        tracing::warn!(store_url = %options.store_url, "store returned no products");
    }

    for product in &products {
        let saved = save(store, product_draft(product, &origin), &mut summary).await;
        if saved {
            summary.products += 1;
        } else {
            tracing::warn!(handle = %product.handle, "skipped product");
        }
    }

    let collections = match client.fetch_collections(&options.store_url).await {
        Ok(collections) => collections,
        Err(e) => {
            tracing::warn!(error = %e, "collections unavailable, continuing without them");
            Vec::new()
        }
    };

    for collection in &collections {
        let saved = save(store, collection_draft(collection, &origin), &mut summary).await;
        if saved {
            summary.collections += 1;
        } else {
            tracing::warn!(handle = %collection.handle, "skipped collection");
        }
    }

    let homepage = homepage_draft(&options.store_url, &options.store_name);
    save(store, Ok(homepage), &mut summary).await;

    tracing::info!(
        processed = summary.processed,
        created = summary.created,
        updated = summary.updated,
        failed = summary.failed,
        "scrape complete"
    );
    Ok(summary)
}

/// Upserts one draft, recording the outcome. Returns whether it was saved.
async fn save(
    store: &dyn PageStore,
    draft: Result<PageDraft, ScraperError>,
    summary: &mut ScrapeSummary,
) -> bool {
    let draft = match draft {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!(error = %e, "could not build page");
            summary.failed += 1;
            return false;
        }
    };

    match store.upsert(&draft).await {
        Ok(outcome) => {
            summary.record(outcome);
            true
        }
        Err(e) => {
            tracing::warn!(url = %draft.url, error = %e, "could not save page");
            summary.failed += 1;
            false
        }
    }
}
