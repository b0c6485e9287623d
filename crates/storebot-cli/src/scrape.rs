//! `scrape` command handler.
//!
//! Per-item failures are logged and counted by the pipeline; only store-wide
//! failures (clearing, crawling `products.json`) abort the run.

use storebot_db::PgPageStore;
use storebot_scraper::{scrape_store, ScrapeOptions, ShopifyClient};

use crate::pages::print_type_breakdown;

/// Scrapes the storefront into `page_contents`, printing counts before and after.
///
/// # Errors
///
/// Returns an error if the Shopify client cannot be built, the database
/// cannot be queried, or the pipeline fails as a whole.
pub(crate) async fn run_scrape(
    pool: &sqlx::PgPool,
    config: &storebot_core::AppConfig,
    domain: Option<String>,
    limit: Option<usize>,
    clear: bool,
) -> anyhow::Result<()> {
    let mut options = ScrapeOptions::from_app_config(config);
    if let Some(domain) = domain {
        options.store_url = normalize_domain(&domain);
    }
    if let Some(limit) = limit {
        options.limit = limit;
    }
    options.clear = clear;

    let before = storebot_db::count_pages(pool).await?;
    println!("pages before: {before}");

    let client = ShopifyClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?;
    let store = PgPageStore::new(pool.clone());

    let summary = scrape_store(&client, &store, &options).await?;

    let after = storebot_db::count_pages(pool).await?;
    if summary.cleared > 0 {
        println!("cleared {} page(s)", summary.cleared);
    }
    println!(
        "saved {} page(s) from {}: {} created, {} updated, {} failed",
        summary.processed, options.store_url, summary.created, summary.updated, summary.failed
    );
    println!(
        "products: {}, collections: {}",
        summary.products, summary.collections
    );
    println!("pages after: {after}");

    let counts = storebot_db::count_pages_by_type(pool).await?;
    print_type_breakdown(&counts);

    Ok(())
}

/// Accepts bare hosts (`shop.example`) as well as full URLs, and always
/// returns a URL ending in `/`.
fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let with_scheme = if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    };
    if with_scheme.ends_with('/') {
        with_scheme
    } else {
        format!("{with_scheme}/")
    }
}
