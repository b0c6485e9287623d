//! Intent routing and the per-process chat state.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use storebot_core::{Lexicon, PageRecord, PageStore, PageType};
use tokio::sync::Mutex;

use crate::cache::ContentCache;
use crate::classifier::{classify_small_talk, detect_language, is_price_query, Language};
use crate::error::ChatError;
use crate::formatter::format_reply;
use crate::llm::{alternatives_prompt, chit_chat_prompt, GenerationParams, TextGenerator};
use crate::matcher::{Matcher, DEFAULT_THRESHOLD};
use crate::normalizer::extract_info;
use crate::price::price_query;
use crate::recent::RecentSuggestions;
use crate::replies::{
    clarification, diverse_sample, direct_alternatives, small_talk_reply, ALTERNATIVE_SAMPLE_SIZE,
};

/// Dialogflow display name of the product question intent.
pub const PRODUCT_QUERY_INTENT: &str = "LLMQueryIntent";

/// Matches at or below this confidence are answered with alternatives.
const MIN_REPLY_SCORE: f64 = 0.4;
/// Answers shorter than this (trimmed) are replaced by a clarification.
const MIN_ANSWER_CHARS: usize = 5;
const HEALTH_SAMPLE_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A question about products.
    ProductQuery,
    /// Everything else, including an empty intent name.
    Fallback,
}

impl Intent {
    #[must_use]
    pub fn from_display_name(name: &str) -> Self {
        if name == PRODUCT_QUERY_INTENT {
            Intent::ProductQuery
        } else {
            Intent::Fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub recent_count: usize,
    pub cache_loaded: bool,
}

/// Store-backed numbers for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub scraped_pages: i64,
    /// First 200 characters of the newest page's excerpt, or `"No data"`.
    pub sample_cleaned_content: String,
}

pub struct ChatEngine {
    store: Arc<dyn PageStore>,
    lexicon: Arc<Lexicon>,
    store_name: String,
    threshold: f64,
    recent: Mutex<RecentSuggestions>,
    rng: Mutex<StdRng>,
    cache: ContentCache,
    llm: Option<Arc<dyn TextGenerator>>,
}

impl ChatEngine {
    #[must_use]
    pub fn new(store: Arc<dyn PageStore>, lexicon: Arc<Lexicon>, store_name: &str) -> Self {
        Self {
            store,
            lexicon,
            store_name: store_name.to_string(),
            threshold: DEFAULT_THRESHOLD,
            recent: Mutex::new(RecentSuggestions::new()),
            rng: Mutex::new(StdRng::from_os_rng()),
            cache: ContentCache::new(),
            llm: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn TextGenerator>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Replaces the entropy-seeded RNG so random picks are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Answers one shopper message. The returned text is never blank.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Store`] if pages cannot be loaded. Text
    /// generation failures are logged and answered from templates.
    pub async fn respond(&self, intent: Intent, query: &str) -> Result<String, ChatError> {
        let answer = match intent {
            Intent::ProductQuery => self.answer_product_query(query).await?,
            Intent::Fallback => self.answer_fallback(query).await?,
        };
        Ok(self.finalize(answer, query))
    }

    /// Swaps an answer too short to be useful for a clarification prompt.
    #[must_use]
    pub fn finalize(&self, answer: String, query: &str) -> String {
        if answer.trim().chars().count() < MIN_ANSWER_CHARS {
            tracing::debug!(answer = %answer, "answer too short, asking for details");
            return clarification(detect_language(query, &self.lexicon)).to_string();
        }
        answer
    }

    /// Reply language for `query`, for callers that need it outside `respond`.
    #[must_use]
    pub fn language_of(&self, query: &str) -> Language {
        detect_language(query, &self.lexicon)
    }

    pub async fn stats(&self) -> EngineStats {
        EngineStats {
            recent_count: self.recent.lock().await.len(),
            cache_loaded: self.cache.is_loaded(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ChatError::Store`] if the store cannot be queried.
    pub async fn health_snapshot(&self) -> Result<HealthSnapshot, ChatError> {
        let scraped_pages = self.store.count().await?;
        let pages = self.store.active_pages().await?;
        let sample_cleaned_content = match pages.first() {
            Some(page) => extract_info(&page.content, &self.lexicon)
                .chars()
                .take(HEALTH_SAMPLE_CHARS)
                .collect(),
            None => "No data".to_string(),
        };
        Ok(HealthSnapshot {
            scraped_pages,
            sample_cleaned_content,
        })
    }

    async fn answer_product_query(&self, query: &str) -> Result<String, ChatError> {
        let language = detect_language(query, &self.lexicon);

        let found = if is_price_query(query, &self.lexicon) {
            let products = self.store.active_pages_of_type(PageType::Product).await?;
            price_query(query, &products, &self.lexicon)
                .map(|listing| (listing.excerpt, listing.score, Some(listing.title.to_string())))
        } else {
            let pages = self.store.active_pages().await?;
            let mut recent = self.recent.lock().await;
            let mut rng = self.rng.lock().await;
            Matcher::new(&self.lexicon, self.threshold)
                .find(query, &pages, &mut recent, &mut *rng)
                .map(|m| (m.excerpt, m.score, m.title))
        };

        match found {
            Some((excerpt, score, title)) if score > MIN_REPLY_SCORE && !excerpt.is_empty() => {
                tracing::info!(score, language = language.as_str(), "answering from page");
                Ok(format_reply(&excerpt, language, title.as_deref()))
            }
            _ => {
                tracing::info!(
                    language = language.as_str(),
                    "no confident match, suggesting alternatives"
                );
                self.alternatives(query, language).await
            }
        }
    }

    async fn answer_fallback(&self, query: &str) -> Result<String, ChatError> {
        let language = detect_language(query, &self.lexicon);

        if let Some(kind) = classify_small_talk(query) {
            tracing::debug!(?kind, "small talk");
            return Ok(small_talk_reply(kind, language, &self.store_name));
        }

        if let Some(llm) = &self.llm {
            let site_content = self
                .cache
                .get_or_load(self.store.as_ref(), &self.lexicon)
                .await?;
            let prompt = chit_chat_prompt(&self.store_name, query, language, &site_content);
            match llm.generate(&prompt, GenerationParams::CHIT_CHAT).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(error = %e, "chit-chat generation failed, using template");
                }
            }
        }

        let sample = self.sample_pages().await?;
        Ok(direct_alternatives(&sample, language, &self.lexicon))
    }

    /// Alternatives phrased by the text generator when one is configured,
    /// otherwise (or when it fails) the bulleted template.
    async fn alternatives(&self, query: &str, language: Language) -> Result<String, ChatError> {
        let sample = self.sample_pages().await?;

        if let (Some(llm), false) = (&self.llm, sample.is_empty()) {
            let products: Vec<(String, String)> = sample
                .iter()
                .map(|p| {
                    (
                        p.display_name().to_string(),
                        extract_info(&p.content, &self.lexicon),
                    )
                })
                .collect();
            let prompt = alternatives_prompt(&self.store_name, query, language, &products);
            match llm.generate(&prompt, GenerationParams::ALTERNATIVES).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(error = %e, "alternatives generation failed, using template");
                }
            }
        }

        Ok(direct_alternatives(&sample, language, &self.lexicon))
    }

    async fn sample_pages(&self) -> Result<Vec<PageRecord>, ChatError> {
        let pages = self.store.active_pages().await?;
        let mut recent = self.recent.lock().await;
        let mut rng = self.rng.lock().await;
        Ok(diverse_sample(
            &pages,
            &mut recent,
            ALTERNATIVE_SAMPLE_SIZE,
            &mut *rng,
        ))
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
