//! Cursor pagination through the `Link` response header.
//!
//! Storefronts that have moved to cursor pagination answer `products.json`
//! with a header such as
//!
//! ```text
//! <https://shop.example/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.example/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! Stores without the header are paged by number instead; see
//! [`crate::client::PageRequest`].

/// Returns the `page_info` cursor of the `rel="next"` link, if any.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|directive| is_next_relation(directive))
        .and_then(link_target)
        .and_then(|target| query_value(target, "page_info"))
}

fn is_next_relation(directive: &str) -> bool {
    directive
        .split(';')
        .skip(1)
        .map(str::trim)
        .any(|param| param == r#"rel="next""# || param == "rel=next")
}

/// The URL between `<` and `>` of one link directive.
fn link_target(directive: &str) -> Option<&str> {
    let start = directive.find('<')? + 1;
    let end = directive[start..].find('>')? + start;
    Some(&directive[start..end])
}

fn query_value(url: &str, key: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
