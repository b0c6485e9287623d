pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod pipeline;
pub mod rate_limit;
pub mod types;

pub use client::{extract_store_origin, PageRequest, ShopifyClient};
pub use error::ScraperError;
pub use normalize::{collection_draft, homepage_draft, product_draft, strip_html};
pub use pipeline::{scrape_store, ScrapeOptions, ScrapeSummary};
pub use rate_limit::RetryPolicy;
pub use types::{
    ShopifyCollection, ShopifyCollectionsResponse, ShopifyProduct, ShopifyProductsResponse,
    ShopifyVariant,
};
