//! Conversion from storefront catalog records to [`PageDraft`]s.
//!
//! Product content is a fixed sequence of `Label: value` blocks separated by
//! blank lines, e.g.
//!
//! ```text
//! Product: Rose Kurta
//!
//! Price: Rs.4500.00 | Rs.5200.00
//!
//! Status: Available
//! ```
//!
//! The chat side reads these blocks back (`Price:` lines, `Rs.` amounts), so
//! the labels are part of the stored format.

use std::sync::LazyLock;

use regex::Regex;
use storebot_core::{PageDraft, PageType};

use crate::error::ScraperError;
use crate::types::{ShopifyCollection, ShopifyProduct};

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Matches `page_contents.title`.
const MAX_TITLE_CHARS: usize = 255;
const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_PRICES: usize = 2;
const MAX_OPTIONS: usize = 10;
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Builds the stored page for one product.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the product has no handle.
pub fn product_draft(product: &ShopifyProduct, origin: &str) -> Result<PageDraft, ScraperError> {
    let handle = require_handle("product", &product.handle)?;

    let mut parts = vec![format!("Product: {}", product.title.trim())];

    let prices = first_distinct(
        product
            .variants
            .iter()
            .map(|v| v.price.trim())
            .filter(|p| !p.is_empty())
            .map(|p| format!("Rs.{p}")),
        MAX_PRICES,
    );
    if !prices.is_empty() {
        parts.push(format!("Price: {}", prices.join(" | ")));
    }

    let available = product.variants.is_empty() || product.variants.iter().any(|v| v.available);
    parts.push(format!(
        "Status: {}",
        if available { "Available" } else { "Sold out" }
    ));

    let options = first_distinct(
        product
            .variants
            .iter()
            .map(|v| v.title.trim())
            .filter(|t| !t.is_empty() && *t != DEFAULT_VARIANT_TITLE)
            .map(str::to_owned),
        MAX_OPTIONS,
    );
    if !options.is_empty() {
        parts.push(format!("Options: {}", options.join(", ")));
    }

    if let Some(category) = non_blank(product.product_type.as_deref()) {
        parts.push(format!("Category: {category}"));
    }
    if let Some(brand) = non_blank(product.vendor.as_deref()) {
        parts.push(format!("Brand: {brand}"));
    }
    if !product.tags.is_empty() {
        parts.push(format!("Tags: {}", product.tags.join(", ")));
    }

    let description = product.body_html.as_deref().map(strip_html).unwrap_or_default();
    if !description.is_empty() {
        parts.push(format!(
            "Description: {}",
            truncate_chars(&description, MAX_DESCRIPTION_CHARS)
        ));
    }

    Ok(PageDraft {
        url: format!("{}/products/{handle}", origin.trim_end_matches('/')),
        title: title_of(&product.title),
        content: parts.join("\n\n"),
        page_type: PageType::Product,
    })
}

/// Builds the stored page for one collection.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the collection has no handle.
pub fn collection_draft(
    collection: &ShopifyCollection,
    origin: &str,
) -> Result<PageDraft, ScraperError> {
    let handle = require_handle("collection", &collection.handle)?;

    let mut parts = vec![format!("Collection: {}", collection.title.trim())];
    let description = collection
        .body_html
        .as_deref()
        .map(strip_html)
        .unwrap_or_default();
    if !description.is_empty() {
        parts.push(format!("Description: {description}"));
    }

    Ok(PageDraft {
        url: format!("{}/collections/{handle}", origin.trim_end_matches('/')),
        title: title_of(&collection.title),
        content: parts.join("\n\n"),
        page_type: PageType::Collection,
    })
}

/// Fixed landing-page record so general questions have something to match.
#[must_use]
pub fn homepage_draft(store_url: &str, store_name: &str) -> PageDraft {
    PageDraft {
        url: store_url.to_owned(),
        title: title_of(&format!("{store_name} - Home")),
        content: format!(
            "Welcome to {store_name}. Browse our collections of premium Pakistani clothing \
             including co-ord sets, dresses, and more."
        ),
        page_type: PageType::Page,
    }
}

/// Removes HTML tags, decodes the handful of entities merchants commonly
/// paste, and trims the result.
#[must_use]
pub fn strip_html(html: &str) -> String {
    HTML_TAG_RE
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_owned()
}

fn require_handle<'a>(kind: &'static str, handle: &'a str) -> Result<&'a str, ScraperError> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(ScraperError::Normalization {
            kind,
            handle: handle.to_owned(),
            reason: "handle is empty".into(),
        });
    }
    Ok(handle)
}

fn title_of(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| truncate_chars(trimmed, MAX_TITLE_CHARS).to_owned())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First `limit` distinct items, in order of first appearance.
fn first_distinct<I>(items: I, limit: usize) -> Vec<String>
where
    I: Iterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if out.len() == limit {
            break;
        }
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
