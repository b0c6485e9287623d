//! Answering shopper questions from scraped storefront pages.
//!
//! [`ChatEngine`] is the entry point; the other modules are the pieces it
//! composes and are public so the CLI and tests can drive them directly.

pub mod cache;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod llm;
pub mod matcher;
pub mod normalizer;
pub mod price;
pub mod recent;
pub mod replies;

pub use cache::ContentCache;
pub use classifier::{
    classify_small_talk, detect_language, is_price_query, price_direction, Language, PriceOrder,
    SmallTalk,
};
pub use engine::{ChatEngine, EngineStats, HealthSnapshot, Intent, PRODUCT_QUERY_INTENT};
pub use error::{ChatError, LlmError};
pub use formatter::format_reply;
pub use llm::{GeminiClient, GenerationParams, TextGenerator};
pub use matcher::{Matcher, PageMatch, DEFAULT_THRESHOLD};
pub use normalizer::{clean_text, extract_info};
pub use price::{price_query, PriceListing, PricedProduct};
pub use recent::RecentSuggestions;
