use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use storebot_core::{InMemoryPageStore, PageDraft, StoreError, UpsertOutcome};

use super::*;
use crate::error::LlmError;
use crate::fixtures::{product, product_page};

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

/// Generator that returns a canned result and records every prompt.
struct ScriptedGenerator {
    reply: Option<String>,
    prompts: StdMutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            prompts: StdMutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: StdMutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _params: GenerationParams) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or(LlmError::Status { status: 500 })
    }
}

/// Store whose every call fails.
struct DownStore;

#[async_trait]
impl PageStore for DownStore {
    async fn active_pages(&self) -> Result<Vec<PageRecord>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn active_pages_of_type(&self, _: PageType) -> Result<Vec<PageRecord>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn upsert(&self, _: &PageDraft) -> Result<UpsertOutcome, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

fn catalog() -> Vec<PageRecord> {
    vec![
        product(
            "crimson-gown",
            "Crimson Evening Gown",
            "Product: Crimson Evening Gown\n\nPrice: Rs.8,500.00\n\nStatus: Available\n\n\
             Description: A flowing red chiffon dress with hand embroidered sleeves.",
        ),
        product(
            "lawn-suit",
            "Lawn Suit",
            "Product: Lawn Suit\n\nPrice: Rs.500.00\n\nStatus: Available\n\n\
             Description: Printed lawn fabric for hot summer days.",
        ),
        product(
            "silk-saree",
            "Silk Saree",
            "Product: Silk Saree\n\nPrice: Rs.1,200.00\n\nStatus: Available\n\n\
             Description: Pure silk saree with a zari border.",
        ),
        product_page(
            "https://shop.example/",
            Some("Silk and Saffron - Home"),
            "Welcome to Silk and Saffron. Browse our collections of premium Pakistani clothing.",
        ),
    ]
}

fn engine_with(pages: Vec<PageRecord>) -> ChatEngine {
    let store: Arc<dyn PageStore> = Arc::new(InMemoryPageStore::with_pages(pages));
    ChatEngine::new(store, Arc::new(Lexicon::default()), "Silk and Saffron").with_seed(11)
}

// -----------------------------------------------------------------------
// Product questions
// -----------------------------------------------------------------------

#[tokio::test]
async fn red_dress_answers_from_color_and_category_match() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::ProductQuery, "red dress")
        .await
        .unwrap();
    assert!(reply.starts_with("✨ **Crimson Evening Gown**\n\n"), "{reply}");
    assert!(reply.contains("red chiffon dress"));
    assert!(reply.ends_with("\n\nWant more details?"));
    assert_eq!(engine.stats().await.recent_count, 1);
}

#[tokio::test]
async fn urdu_question_gets_urdu_template() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::ProductQuery, "mujhe red dress dikhao")
        .await
        .unwrap();
    assert!(reply.starts_with("✨ **Crimson Evening Gown**"));
    assert!(reply.ends_with("💬 Aur details chahiye?"));
}

#[tokio::test]
async fn repeated_question_moves_on_to_another_page() {
    let mut pages = catalog();
    pages.push(product(
        "ruby-frock",
        "Ruby Frock",
        "Description: Short red cotton dress with a flared hem.",
    ));
    let engine = engine_with(pages);

    let first = engine.respond(Intent::ProductQuery, "red dress").await.unwrap();
    let second = engine.respond(Intent::ProductQuery, "red dress").await.unwrap();
    assert_ne!(first, second);
    assert_eq!(engine.stats().await.recent_count, 2);
}

#[tokio::test]
async fn budget_question_lists_products_by_price() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::ProductQuery, "budget options please")
        .await
        .unwrap();
    assert_eq!(
        reply,
        "✨ **Price Comparison**\n\n\
         🌟 Most affordable options:\n\n\
         1. Lawn Suit - Rs.500\n\
         2. Silk Saree - Rs.1200\n\
         3. Crimson Evening Gown - Rs.8500\n\
         \nWhich one would you like to see? 😊\n\nWant more details?"
    );
}

#[tokio::test]
async fn unmatched_question_offers_alternatives() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::ProductQuery, "velvet lehenga")
        .await
        .unwrap();
    assert!(reply.starts_with("Here are some options:\n\n• "), "{reply}");
    assert!(reply.ends_with("Which one would you like to know more about? 😊"));
}

#[tokio::test]
async fn unmatched_question_uses_generator_when_configured() {
    let generator = ScriptedGenerator::replying("Try our Lawn Suit or Silk Saree. Which one?");
    let engine = engine_with(catalog()).with_llm(generator.clone());
    let reply = engine
        .respond(Intent::ProductQuery, "velvet lehenga")
        .await
        .unwrap();
    assert_eq!(reply, "Try our Lawn Suit or Silk Saree. Which one?");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User searched for: velvet lehenga"));
}

#[tokio::test]
async fn generator_failure_falls_back_to_template() {
    let generator = ScriptedGenerator::failing();
    let engine = engine_with(catalog()).with_llm(generator.clone());
    let reply = engine
        .respond(Intent::ProductQuery, "velvet lehenga")
        .await
        .unwrap();
    assert!(reply.starts_with("Here are some options:"));
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn empty_store_apologizes() {
    let engine = engine_with(Vec::new());
    let reply = engine
        .respond(Intent::ProductQuery, "red dress")
        .await
        .unwrap();
    assert_eq!(
        reply,
        "Sorry! Products not available right now. Please try again later."
    );
}

// -----------------------------------------------------------------------
// Fallback intent
// -----------------------------------------------------------------------

#[tokio::test]
async fn greeting_gets_canned_reply() {
    let engine = engine_with(catalog());
    let reply = engine.respond(Intent::Fallback, "Hello").await.unwrap();
    assert_eq!(
        reply,
        "Hello! How can I help you today? Feel free to ask about our products. 😊"
    );
}

#[tokio::test]
async fn urdu_farewell() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::Fallback, "ok ap ko khuda hafiz")
        .await
        .unwrap();
    assert_eq!(reply, "Khuda hafiz! Dobara zaroor aaiyega. 👋");
}

#[tokio::test]
async fn chit_chat_uses_generator_with_site_content() {
    let generator = ScriptedGenerator::replying("We have lovely Eid outfits, take a look!");
    let engine = engine_with(catalog()).with_llm(generator.clone());
    assert!(!engine.stats().await.cache_loaded);

    let reply = engine
        .respond(Intent::Fallback, "what's new this season")
        .await
        .unwrap();
    assert_eq!(reply, "We have lovely Eid outfits, take a look!");
    assert!(generator.prompts()[0].contains("Page: Crimson Evening Gown\nContent: "));
    assert!(engine.stats().await.cache_loaded);
}

#[tokio::test]
async fn chit_chat_without_generator_offers_alternatives() {
    let engine = engine_with(catalog());
    let reply = engine
        .respond(Intent::Fallback, "what's new this season")
        .await
        .unwrap();
    assert!(reply.starts_with("Here are some options:"));
}

// -----------------------------------------------------------------------
// Safety net, errors, health
// -----------------------------------------------------------------------

#[tokio::test]
async fn short_generated_answer_is_replaced_by_clarification() {
    let generator = ScriptedGenerator::replying(" ok ");
    let engine = engine_with(catalog()).with_llm(generator);
    let reply = engine
        .respond(Intent::Fallback, "mmm kya scene")
        .await
        .unwrap();
    assert_eq!(
        reply,
        "Maaf kijiye! Kya aap apna sawal thoda detail mein puch sakte hain?"
    );
}

#[test]
fn finalize_keeps_long_enough_answers() {
    let engine = engine_with(Vec::new());
    assert_eq!(engine.finalize("Hello".to_string(), "hi"), "Hello");
    assert_eq!(
        engine.finalize("Hey".to_string(), "hi"),
        "Sorry! Could you please provide more details?"
    );
}

#[tokio::test]
async fn store_failure_is_an_error() {
    let engine = ChatEngine::new(Arc::new(DownStore), Arc::new(Lexicon::default()), "Shop");
    let err = engine
        .respond(Intent::ProductQuery, "red dress")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Store(_)));
}

#[tokio::test]
async fn health_snapshot_samples_newest_page() {
    let engine = engine_with(catalog());
    let snapshot = engine.health_snapshot().await.unwrap();
    assert_eq!(snapshot.scraped_pages, 4);
    assert!(!snapshot.sample_cleaned_content.is_empty());
    assert!(snapshot.sample_cleaned_content.chars().count() <= 200);

    let empty = engine_with(Vec::new()).health_snapshot().await.unwrap();
    assert_eq!(empty.scraped_pages, 0);
    assert_eq!(empty.sample_cleaned_content, "No data");
}

#[test]
fn intent_names() {
    assert_eq!(Intent::from_display_name("LLMQueryIntent"), Intent::ProductQuery);
    assert_eq!(Intent::from_display_name("Default Fallback Intent"), Intent::Fallback);
    assert_eq!(Intent::from_display_name(""), Intent::Fallback);
}
