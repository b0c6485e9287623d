//! Cleanup of scraped page text before matching and display.

use storebot_core::Lexicon;

/// Cleaned text of this length or shorter is dropped by [`clean_text`].
const MIN_LINE_CHARS: usize = 10;
const MIN_SENTENCE_WORDS: usize = 5;
const MAX_SENTENCE_WORDS: usize = 100;
const MAX_SENTENCES: usize = 3;
const FALLBACK_CHARS: usize = 300;

/// Strips storefront boilerplate from scraped text.
///
/// Noise rules run in lexicon order, then every whitespace run (newlines
/// included) collapses to one space. The result is dropped entirely when
/// it is 10 characters or shorter or is a single run of symbols.
#[must_use]
pub fn clean_text(raw: &str, lexicon: &Lexicon) -> String {
    let mut text = raw.to_string();
    for rule in &lexicon.noise_rules {
        text = rule
            .pattern
            .replace_all(&text, regex::NoExpand(&rule.replacement))
            .into_owned();
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if is_meaningful(&collapsed) {
        collapsed
    } else {
        String::new()
    }
}

fn is_meaningful(text: &str) -> bool {
    let symbols_only = text.chars().all(|c| !is_word_char(c) && !c.is_whitespace());
    text.chars().count() > MIN_LINE_CHARS && !symbols_only
}

/// Short descriptive excerpt of a page: up to three sentences of 5 to 100
/// words that mention no navigation terms, or the first 300 cleaned
/// characters when none qualify.
#[must_use]
pub fn extract_info(raw: &str, lexicon: &Lexicon) -> String {
    let cleaned = clean_text(raw, lexicon);

    let sentences: Vec<&str> = cleaned
        .split('.')
        .map(str::trim)
        .filter(|sentence| {
            let words = sentence.split_whitespace().count();
            (MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS).contains(&words)
                && !mentions_navigation(sentence, lexicon)
        })
        .take(MAX_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return cleaned.chars().take(FALLBACK_CHARS).collect();
    }
    format!("{}.", sentences.join(". "))
}

fn mentions_navigation(sentence: &str, lexicon: &Lexicon) -> bool {
    let lower = sentence.to_lowercase();
    lexicon
        .navigation_terms
        .iter()
        .any(|term| lower.contains(term.as_str()))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
