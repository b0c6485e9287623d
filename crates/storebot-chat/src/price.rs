//! Cheapest / most expensive product listings.

use storebot_core::{Lexicon, PageRecord, PageType};

use crate::classifier::{detect_language, price_direction, Language, PriceOrder};

pub const PRICE_LISTING_SCORE: f64 = 0.95;
pub const PRICE_LISTING_TITLE: &str = "Price Comparison";
const LISTING_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct PricedProduct {
    pub url: String,
    pub title: String,
    pub price: f64,
}

/// Ready-to-format price answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceListing {
    pub excerpt: String,
    pub score: f64,
    pub title: &'static str,
    pub products: Vec<PricedProduct>,
}

/// First price found in `content`, thousands separators removed.
#[must_use]
pub fn first_price(content: &str, lexicon: &Lexicon) -> Option<f64> {
    let caps = lexicon.price_pattern.captures(content)?;
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

/// Active product pages with a readable price, sorted by `order`, top three.
/// Equal prices keep store order.
#[must_use]
pub fn rank_by_price(pages: &[PageRecord], order: PriceOrder, lexicon: &Lexicon) -> Vec<PricedProduct> {
    let mut priced: Vec<PricedProduct> = pages
        .iter()
        .filter(|p| p.is_active && p.page_type == PageType::Product)
        .filter_map(|p| {
            first_price(&p.content, lexicon).map(|price| PricedProduct {
                url: p.url.clone(),
                title: p.display_name().to_string(),
                price,
            })
        })
        .collect();

    match order {
        PriceOrder::Ascending => priced.sort_by(|a, b| a.price.total_cmp(&b.price)),
        PriceOrder::Descending => priced.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
    priced.truncate(LISTING_SIZE);
    priced
}

/// Answers a price question from `pages`. `None` when no product has a price.
#[must_use]
pub fn price_query(query: &str, pages: &[PageRecord], lexicon: &Lexicon) -> Option<PriceListing> {
    let order = price_direction(query, lexicon);
    let products = rank_by_price(pages, order, lexicon);
    if products.is_empty() {
        return None;
    }

    let language = detect_language(query, lexicon);
    let header = match (order, language) {
        (PriceOrder::Ascending, Language::Urdu) => "🌟 Sabse saste options:",
        (PriceOrder::Ascending, Language::English) => "🌟 Most affordable options:",
        (PriceOrder::Descending, _) => "🌟 Premium options:",
    };
    let footer = match language {
        Language::Urdu => "Kaunsa dekhna chahein? 😊",
        Language::English => "Which one would you like to see? 😊",
    };

    let mut excerpt = format!("{header}\n\n");
    for (i, product) in products.iter().enumerate() {
        excerpt.push_str(&format!(
            "{}. {} - Rs.{}\n",
            i + 1,
            product.title,
            whole_rupees(product.price)
        ));
    }
    excerpt.push('\n');
    excerpt.push_str(footer);

    Some(PriceListing {
        excerpt,
        score: PRICE_LISTING_SCORE,
        title: PRICE_LISTING_TITLE,
        products,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn whole_rupees(price: f64) -> i64 {
    price.trunc() as i64
}
