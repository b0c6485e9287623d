//! Multi-page product crawl for `ShopifyClient`.

use std::time::Duration;

use crate::error::ScraperError;
use crate::pagination::extract_next_cursor;
use crate::types::ShopifyProduct;

use super::{PageRequest, ShopifyClient, MAX_PAGES};

impl ShopifyClient {
    /// Fetches products page by page until the catalog is exhausted or
    /// `max_products` have been collected.
    ///
    /// Paging starts at `?page=1`. When a response carries a `Link` header
    /// with a `rel="next"` cursor the crawl switches to cursor paging and
    /// ends when a response has no next link. In either mode an empty page
    /// ends the crawl.
    ///
    /// `inter_request_delay_ms` is slept between consecutive page requests.
    ///
    /// Any page failure discards earlier pages and returns the error.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`].
    /// Returns [`ScraperError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(
        &self,
        store_url: &str,
        page_size: u32,
        inter_request_delay_ms: u64,
        max_products: Option<usize>,
    ) -> Result<Vec<ShopifyProduct>, ScraperError> {
        let mut products: Vec<ShopifyProduct> = Vec::new();
        let mut page_number = 1u32;
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0usize;

        loop {
            if pages_fetched == MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    store_url: store_url.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if pages_fetched > 0 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let request = cursor
                .as_deref()
                .map_or(PageRequest::Number(page_number), PageRequest::Cursor);
            let (response, link_header) = self
                .fetch_products_page(store_url, page_size, request)
                .await?;
            pages_fetched += 1;

            if response.products.is_empty() {
                break;
            }

            tracing::debug!(
                store_url,
                page = pages_fetched,
                count = response.products.len(),
                "fetched products page"
            );
            products.extend(response.products);

            if max_products.is_some_and(|max| products.len() >= max) {
                break;
            }

            match extract_next_cursor(link_header.as_deref()) {
                Some(next) => cursor = Some(next),
                None if cursor.is_some() => break,
                None => page_number += 1,
            }
        }

        if let Some(max) = max_products {
            products.truncate(max);
        }

        Ok(products)
    }
}
