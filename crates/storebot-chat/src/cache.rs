//! Site summary handed to the text generator for open-ended chat.

use storebot_core::{Lexicon, PageRecord, PageStore, StoreError};
use tokio::sync::OnceCell;

use crate::normalizer::extract_info;

const MAX_PAGES: usize = 20;
const MAX_CHARS: usize = 3000;
pub const CONTENT_UNAVAILABLE: &str = "Website content not available";

/// Lazily built summary of the first stored pages.
///
/// Built on first use and kept for the life of the process. An empty
/// summary is not kept, so a later call retries once pages exist.
#[derive(Debug, Default)]
pub struct ContentCache {
    text: OnceCell<String>,
}

impl ContentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.text.initialized()
    }

    /// Returns the cached summary, building it from `store` on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the pages cannot be loaded.
    pub async fn get_or_load(
        &self,
        store: &dyn PageStore,
        lexicon: &Lexicon,
    ) -> Result<String, StoreError> {
        if let Some(text) = self.text.get() {
            return Ok(text.clone());
        }

        let pages = store.active_pages().await?;
        let text = summarize(&pages, lexicon);
        if text.is_empty() {
            return Ok(CONTENT_UNAVAILABLE.to_string());
        }

        // A concurrent build may have won; either result is equivalent.
        let _ = self.text.set(text);
        Ok(self.text.get().cloned().unwrap_or_default())
    }
}

/// `Page:`/`Content:` blocks for the first 20 pages, capped at 3000 characters.
#[must_use]
pub fn summarize(pages: &[PageRecord], lexicon: &Lexicon) -> String {
    let joined = pages
        .iter()
        .take(MAX_PAGES)
        .map(|p| {
            format!(
                "Page: {}\nContent: {}",
                p.display_name(),
                extract_info(&p.content, lexicon)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    joined.chars().take(MAX_CHARS).collect()
}
