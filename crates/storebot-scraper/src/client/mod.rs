//! HTTP client for a storefront's public catalog endpoints.

mod fetch_all;
mod origin;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::rate_limit::RetryPolicy;
use crate::types::{ShopifyCollection, ShopifyCollectionsResponse, ShopifyProductsResponse};

pub use origin::extract_store_origin;
#[cfg(test)]
use origin::extract_domain;

/// Upper bound on `products.json` pages per crawl. Guards against stores that
/// ignore `page` and keep returning the same non-empty page.
pub(super) const MAX_PAGES: usize = 200;

/// Which page of `products.json` to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest<'a> {
    /// Classic `?page=N` paging, 1-based.
    Number(u32),
    /// Cursor taken from a previous response's `Link` header.
    Cursor(&'a str),
}

/// Client for `products.json` and `collections.json`.
///
/// 429 responses and network failures are retried per [`RetryPolicy`]; 404
/// and any other non-2xx status fail immediately as typed errors.
pub struct ShopifyClient {
    client: Client,
    retry: RetryPolicy,
}

impl ShopifyClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            retry: RetryPolicy::new(max_retries, backoff_base_secs),
        })
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &storebot_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    /// Fetches one page of products. Returns the page and the raw `Link`
    /// header, if the store sent one.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network failure after all retries.
    /// - [`ScraperError::Deserialize`]: body is not a products document.
    pub async fn fetch_products_page(
        &self,
        store_url: &str,
        limit: u32,
        page: PageRequest<'_>,
    ) -> Result<(ShopifyProductsResponse, Option<String>), ScraperError> {
        let url = Self::products_url(store_url, limit, page)?;
        self.get_json(store_url, url, "products page").await
    }

    /// Fetches every collection the store publishes.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::fetch_products_page`].
    pub async fn fetch_collections(
        &self,
        store_url: &str,
    ) -> Result<Vec<ShopifyCollection>, ScraperError> {
        let url = Self::endpoint_url(store_url, "collections.json")?;
        let (response, _link): (ShopifyCollectionsResponse, _) =
            self.get_json(store_url, url.to_string(), "collections").await?;
        Ok(response.collections)
    }

    async fn get_json<T>(
        &self,
        store_url: &str,
        url: String,
        context: &str,
    ) -> Result<(T, Option<String>), ScraperError>
    where
        T: DeserializeOwned,
    {
        self.retry
            .run(|| {
                let url = url.clone();
                async move {
                    let response = self
                        .client
                        .get(&url)
                        .header(reqwest::header::ACCEPT, "application/json")
                        .send()
                        .await?;
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after_secs = response
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(60);
                        return Err(ScraperError::RateLimited {
                            domain: origin::extract_domain(store_url),
                            retry_after_secs,
                        });
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ScraperError::NotFound { url });
                    }

                    if !status.is_success() {
                        return Err(ScraperError::UnexpectedStatus {
                            status: status.as_u16(),
                            url,
                        });
                    }

                    let link_header = response
                        .headers()
                        .get(reqwest::header::LINK)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);

                    let body = response.text().await?;
                    let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
                        ScraperError::Deserialize {
                            context: format!("{context} from {store_url}"),
                            source: e,
                        }
                    })?;

                    Ok((parsed, link_header))
                }
            })
            .await
    }

    /// `{origin}/products.json?limit=N` plus either `page=N` or `page_info=…`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidStoreUrl`] if the origin is not a valid URL base.
    fn products_url(
        store_url: &str,
        limit: u32,
        page: PageRequest<'_>,
    ) -> Result<String, ScraperError> {
        let mut url = Self::endpoint_url(store_url, "products.json")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            match page {
                PageRequest::Number(n) => query.append_pair("page", &n.to_string()),
                PageRequest::Cursor(cursor) => query.append_pair("page_info", cursor),
            };
        }
        Ok(url.to_string())
    }

    fn endpoint_url(store_url: &str, endpoint: &str) -> Result<reqwest::Url, ScraperError> {
        let origin = extract_store_origin(store_url);
        reqwest::Url::parse(&format!("{origin}/{endpoint}")).map_err(|e| {
            ScraperError::InvalidStoreUrl {
                store_url: store_url.to_owned(),
                reason: format!("origin \"{origin}\" is not a valid URL base: {e}"),
            }
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
