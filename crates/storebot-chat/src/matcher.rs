//! Heuristic page scoring and selection for product questions.
//!
//! Each page gets the score of the first rule that applies:
//!
//! | rule                                                    | score       |
//! |---------------------------------------------------------|-------------|
//! | query is a substring of the cleaned content             | 0.9         |
//! | query is a substring of the title                       | 0.85        |
//! | query names a color and a category, content has both    | 0.8         |
//! | query names a color and a category, content has one     | 0.6         |
//! | share of query words (over 2 chars) found in content    | ratio > 0.4 |

use rand::Rng;
use storebot_core::{Lexicon, PageRecord};

use crate::normalizer::extract_info;
use crate::recent::RecentSuggestions;

pub const DEFAULT_THRESHOLD: f64 = 0.3;

const CONTENT_SUBSTRING_SCORE: f64 = 0.9;
const TITLE_SUBSTRING_SCORE: f64 = 0.85;
const COLOR_AND_CATEGORY_SCORE: f64 = 0.8;
const COLOR_OR_CATEGORY_SCORE: f64 = 0.6;
const MIN_KEYWORD_RATIO: f64 = 0.4;
/// Above this the best candidate is returned without a random draw.
const DIRECT_PICK_SCORE: f64 = 0.7;
const RANDOM_POOL: usize = 3;
const MIN_KEYWORD_CHARS: usize = 3;

/// Winning page for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMatch {
    pub url: String,
    pub title: Option<String>,
    /// `extract_info` of the page content, original case.
    pub excerpt: String,
    pub score: f64,
}

/// Query pieces the scoring rules look at, computed once per query.
struct QueryTerms<'q> {
    lower: String,
    colors: Vec<&'q str>,
    categories: Vec<&'q str>,
    keywords: Vec<String>,
}

impl<'q> QueryTerms<'q> {
    fn new(query: &str, lexicon: &'q Lexicon) -> Self {
        let lower = query.to_lowercase();
        let present = |vocab: &'q [String]| -> Vec<&'q str> {
            vocab
                .iter()
                .map(String::as_str)
                .filter(|term| lower.contains(term))
                .collect()
        };
        let colors = present(&lexicon.colors);
        let categories = present(&lexicon.categories);
        let keywords = lower
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
            .map(str::to_owned)
            .collect();

        Self {
            lower,
            colors,
            categories,
            keywords,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    lexicon: &'a Lexicon,
    threshold: f64,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub fn new(lexicon: &'a Lexicon, threshold: f64) -> Self {
        Self { lexicon, threshold }
    }

    /// Scores one page against `query`, returning the score and the page
    /// excerpt. Inactive pages and pages that match no rule score 0.
    #[must_use]
    pub fn score_page(&self, query: &str, page: &PageRecord) -> (f64, String) {
        let terms = QueryTerms::new(query, self.lexicon);
        if terms.lower.is_empty() || !page.is_active {
            return (0.0, String::new());
        }
        self.score(&terms, page)
    }

    fn score(&self, terms: &QueryTerms<'_>, page: &PageRecord) -> (f64, String) {
        let excerpt = extract_info(&page.content, self.lexicon);
        let content = excerpt.to_lowercase();
        let title = page.title.as_deref().unwrap_or_default().to_lowercase();

        let score = if content.contains(&terms.lower) {
            CONTENT_SUBSTRING_SCORE
        } else if title.contains(&terms.lower) {
            TITLE_SUBSTRING_SCORE
        } else if !terms.colors.is_empty() && !terms.categories.is_empty() {
            let has_color = terms.colors.iter().any(|c| content.contains(c));
            let has_category = terms.categories.iter().any(|c| content.contains(c));
            match (has_color, has_category) {
                (true, true) => COLOR_AND_CATEGORY_SCORE,
                (true, false) | (false, true) => COLOR_OR_CATEGORY_SCORE,
                (false, false) => 0.0,
            }
        } else {
            keyword_ratio(&terms.keywords, &content)
        };

        (score, excerpt)
    }

    /// Picks the page that best answers `query`, skipping pages in `recent`.
    ///
    /// Candidates score at least the threshold and have a non-empty excerpt.
    /// A best score above 0.7 wins outright; otherwise the winner is drawn
    /// from the top three. The winner's URL is pushed into `recent`.
    pub fn find<R: Rng>(
        &self,
        query: &str,
        pages: &[PageRecord],
        recent: &mut RecentSuggestions,
        rng: &mut R,
    ) -> Option<PageMatch> {
        let terms = QueryTerms::new(query, self.lexicon);
        if terms.lower.is_empty() {
            return None;
        }

        let mut candidates: Vec<PageMatch> = pages
            .iter()
            .filter(|page| page.is_active && !recent.contains(&page.url))
            .filter_map(|page| {
                let (score, excerpt) = self.score(&terms, page);
                (score >= self.threshold && !excerpt.is_empty()).then(|| PageMatch {
                    url: page.url.clone(),
                    title: page.title.clone(),
                    excerpt,
                    score,
                })
            })
            .collect();

        if candidates.is_empty() {
            tracing::debug!(query = %terms.lower, "no page matched");
            return None;
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        let index = if candidates[0].score > DIRECT_PICK_SCORE {
            0
        } else {
            rng.random_range(0..candidates.len().min(RANDOM_POOL))
        };

        let chosen = candidates.swap_remove(index);
        tracing::debug!(
            query = %terms.lower,
            url = %chosen.url,
            score = chosen.score,
            candidates = candidates.len() + 1,
            "matched page"
        );
        recent.push(chosen.url.clone());
        Some(chosen)
    }
}

/// Fraction of `keywords` found in `content`, or 0 when it is not above 0.4.
#[allow(clippy::cast_precision_loss)]
fn keyword_ratio(keywords: &[String], content: &str) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let matched = keywords
        .iter()
        .filter(|w| content.contains(w.as_str()))
        .count();
    let ratio = matched as f64 / keywords.len() as f64;
    if ratio > MIN_KEYWORD_RATIO {
        ratio
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
