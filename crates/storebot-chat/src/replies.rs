//! Fixed, localized replies that need no page match.

use rand::seq::index::sample;
use rand::Rng;
use storebot_core::{Lexicon, PageRecord};

use crate::classifier::{Language, SmallTalk};
use crate::recent::RecentSuggestions;

/// Pages offered when nothing matched.
pub const ALTERNATIVE_SAMPLE_SIZE: usize = 5;
const ALTERNATIVES_LISTED: usize = 3;

#[must_use]
pub fn small_talk_reply(kind: SmallTalk, language: Language, store_name: &str) -> String {
    match (kind, language) {
        (SmallTalk::Greeting, Language::Urdu) => {
            "Salam! Main aapki kaise madad kar sakti hoon? Aap apne pasand ka product puch sakte hain. 😊".to_string()
        }
        (SmallTalk::Greeting, Language::English) => {
            "Hello! How can I help you today? Feel free to ask about our products. 😊".to_string()
        }
        (SmallTalk::Thanks, Language::Urdu) => {
            "Khushi hui madad karke! Kuch aur chahiye? 😊".to_string()
        }
        (SmallTalk::Thanks, Language::English) => {
            "You're welcome! Anything else I can help with? 😊".to_string()
        }
        (SmallTalk::Identity, Language::Urdu) => format!(
            "Main {store_name} ki assistant hoon. Aap mujhse products ke baare mein puch sakte hain! 💫"
        ),
        (SmallTalk::Identity, Language::English) => {
            format!("I'm {store_name}'s assistant. Ask me about our products! 💫")
        }
        (SmallTalk::Farewell, Language::Urdu) => {
            "Khuda hafiz! Dobara zaroor aaiyega. 👋".to_string()
        }
        (SmallTalk::Farewell, Language::English) => {
            "Goodbye! Visit us again soon. 👋".to_string()
        }
    }
}

/// Last-resort prompt for answers too short to send.
#[must_use]
pub fn clarification(language: Language) -> &'static str {
    match language {
        Language::Urdu => "Maaf kijiye! Kya aap apna sawal thoda detail mein puch sakte hain?",
        Language::English => "Sorry! Could you please provide more details?",
    }
}

#[must_use]
pub fn products_unavailable(language: Language) -> &'static str {
    match language {
        Language::Urdu => {
            "Maaf kijiye! Abhi products load nahi ho rahe. Thodi der baad try karein."
        }
        Language::English => "Sorry! Products not available right now. Please try again later.",
    }
}

/// Bulleted list of the first three `pages` with their `Price:` line, or
/// the unavailable apology when `pages` is empty.
#[must_use]
pub fn direct_alternatives(pages: &[PageRecord], language: Language, lexicon: &Lexicon) -> String {
    if pages.is_empty() {
        return products_unavailable(language).to_string();
    }

    let bullets = pages
        .iter()
        .take(ALTERNATIVES_LISTED)
        .map(|page| {
            let title = page
                .title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("Product");
            match price_line(&page.content, lexicon) {
                Some(price) => format!("• {title} - {price}"),
                None => format!("• {title}"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    match language {
        Language::Urdu => format!("Yeh options dekh sakte hain:\n\n{bullets}\n\nKaunsa pasand aaya? 😊"),
        Language::English => format!(
            "Here are some options:\n\n{bullets}\n\nWhich one would you like to know more about? 😊"
        ),
    }
}

/// Up to `limit` random pages not suggested recently.
///
/// When every page has been suggested recently the memory is cleared and
/// the whole set is sampled again. Sample order is random.
pub fn diverse_sample<R: Rng>(
    pages: &[PageRecord],
    recent: &mut RecentSuggestions,
    limit: usize,
    rng: &mut R,
) -> Vec<PageRecord> {
    let mut available: Vec<&PageRecord> = pages
        .iter()
        .filter(|p| !recent.contains(&p.url))
        .collect();
    if available.is_empty() {
        available = pages.iter().collect();
        recent.clear();
    }

    if available.len() <= limit {
        return available.into_iter().cloned().collect();
    }
    sample(rng, available.len(), limit)
        .into_iter()
        .map(|i| available[i].clone())
        .collect()
}

fn price_line<'c>(content: &'c str, lexicon: &Lexicon) -> Option<&'c str> {
    let caps = lexicon.price_line_pattern.captures(content)?;
    caps.get(1).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::fixtures::{product, product_page};

    fn lexicon() -> Lexicon {
        Lexicon::default()
    }

    #[test]
    fn identity_reply_names_the_store() {
        assert_eq!(
            small_talk_reply(SmallTalk::Identity, Language::English, "Silk and Saffron"),
            "I'm Silk and Saffron's assistant. Ask me about our products! 💫"
        );
        assert!(small_talk_reply(SmallTalk::Identity, Language::Urdu, "Silk and Saffron")
            .starts_with("Main Silk and Saffron ki assistant hoon."));
    }

    #[test]
    fn alternatives_list_first_three_with_prices() {
        let pages = vec![
            product("a", "Lawn Suit", "Product: Lawn Suit\n\nPrice: Rs.500.00 | Rs.650.00\n\nStatus: Available"),
            product("b", "Silk Saree", "Collection of silk"),
            product_page("https://shop.example/products/c", None, "Price: Rs.300.00"),
            product("d", "Fourth", "Price: Rs.1.00"),
        ];
        assert_eq!(
            direct_alternatives(&pages, Language::English, &lexicon()),
            "Here are some options:\n\n\
             • Lawn Suit - Rs.500.00 | Rs.650.00\n\
             • Silk Saree\n\
             • Product - Rs.300.00\n\n\
             Which one would you like to know more about? 😊"
        );
    }

    #[test]
    fn urdu_alternatives_wrapper() {
        let pages = vec![product("a", "Lawn Suit", "Price: Rs.500.00")];
        assert_eq!(
            direct_alternatives(&pages, Language::Urdu, &lexicon()),
            "Yeh options dekh sakte hain:\n\n• Lawn Suit - Rs.500.00\n\nKaunsa pasand aaya? 😊"
        );
    }

    #[test]
    fn no_pages_is_unavailable_apology() {
        assert_eq!(
            direct_alternatives(&[], Language::English, &lexicon()),
            "Sorry! Products not available right now. Please try again later."
        );
        assert!(direct_alternatives(&[], Language::Urdu, &lexicon()).starts_with("Maaf kijiye!"));
    }

    #[test]
    fn diverse_sample_skips_recent_pages() {
        let pages: Vec<_> = (0..4).map(|i| product(&i.to_string(), "P", "c")).collect();
        let mut recent = RecentSuggestions::new();
        recent.push("https://shop.example/products/0");
        recent.push("https://shop.example/products/1");
        let mut rng = StdRng::seed_from_u64(3);

        let sampled = diverse_sample(&pages, &mut recent, 5, &mut rng);
        let urls: Vec<_> = sampled.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://shop.example/products/2", "https://shop.example/products/3"]
        );
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn diverse_sample_resets_when_everything_is_recent() {
        let pages: Vec<_> = (0..2).map(|i| product(&i.to_string(), "P", "c")).collect();
        let mut recent = RecentSuggestions::new();
        recent.push("https://shop.example/products/0");
        recent.push("https://shop.example/products/1");
        let mut rng = StdRng::seed_from_u64(3);

        let sampled = diverse_sample(&pages, &mut recent, 5, &mut rng);
        assert_eq!(sampled.len(), 2);
        assert!(recent.is_empty());
    }

    #[test]
    fn diverse_sample_caps_at_limit_without_duplicates() {
        let pages: Vec<_> = (0..12).map(|i| product(&i.to_string(), "P", "c")).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let sampled = diverse_sample(&pages, &mut RecentSuggestions::new(), 5, &mut rng);
        assert_eq!(sampled.len(), 5);
        let unique: std::collections::HashSet<_> = sampled.iter().map(|p| &p.url).collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn clarification_is_localized() {
        assert_eq!(
            clarification(Language::English),
            "Sorry! Could you please provide more details?"
        );
        assert!(clarification(Language::Urdu).starts_with("Maaf kijiye!"));
    }
}
