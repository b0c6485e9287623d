//! Query language, price intent, and small-talk detection.

use storebot_core::Lexicon;

/// Reply language. Roman Urdu and Urdu script both map to `Urdu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Urdu,
    English,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Urdu => "urdu",
            Language::English => "english",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    /// Cheapest first.
    Ascending,
    /// Most expensive first.
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalk {
    Greeting,
    Thanks,
    Identity,
    Farewell,
}

/// Cue lists in priority order. Single words match whole words, phrases
/// match anywhere.
const SMALL_TALK_CUES: &[(SmallTalk, &[&str])] = &[
    (SmallTalk::Greeting, &["hello", "hi", "salam", "hey"]),
    (
        SmallTalk::Thanks,
        &["thanks", "thank you", "shukriya", "thankyou"],
    ),
    (SmallTalk::Identity, &["naam", "name", "kaun", "who"]),
    (SmallTalk::Farewell, &["bye", "khuda hafiz", "goodbye"]),
];

/// `Urdu` when the text contains Arabic-script characters or any
/// whitespace-separated word contains a Roman Urdu token, ignoring case.
///
/// Tokens are matched as substrings, so `"apparel"` (via `ap`) counts.
#[must_use]
pub fn detect_language(text: &str, lexicon: &Lexicon) -> Language {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        return Language::Urdu;
    }

    let lower = text.to_lowercase();
    let has_token = lower.split_whitespace().any(|word| {
        lexicon
            .urdu_tokens
            .iter()
            .any(|token| word.contains(token.as_str()))
    });
    if has_token {
        Language::Urdu
    } else {
        Language::English
    }
}

#[must_use]
pub fn is_price_query(query: &str, lexicon: &Lexicon) -> bool {
    contains_any(&query.to_lowercase(), &lexicon.price_keywords)
}

#[must_use]
pub fn price_direction(query: &str, lexicon: &Lexicon) -> PriceOrder {
    if contains_any(&query.to_lowercase(), &lexicon.cheap_keywords) {
        PriceOrder::Ascending
    } else {
        PriceOrder::Descending
    }
}

#[must_use]
pub fn classify_small_talk(query: &str) -> Option<SmallTalk> {
    let lower = query.to_lowercase();
    let query_words: Vec<String> = words(&lower).collect();

    SMALL_TALK_CUES
        .iter()
        .find(|(_, cues)| {
            cues.iter().any(|cue| {
                if cue.contains(' ') {
                    lower.contains(cue)
                } else {
                    query_words.iter().any(|w| w == cue)
                }
            })
        })
        .map(|(kind, _)| *kind)
}

/// Lower-cased whitespace-separated words with surrounding punctuation removed.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}
