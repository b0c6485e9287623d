//! Response types for the public storefront endpoints `products.json` and
//! `collections.json`.
//!
//! ### Tags
//! Current storefronts return tags as a JSON array of strings. Older themes
//! and some proxies still send the legacy comma-separated string, so both
//! shapes are accepted and normalized to a `Vec<String>`.
//!
//! ### `available` on variants
//! Boolean; may be absent on older stores. Defaults to `true`.
//!
//! ### `body_html`
//! Raw HTML; `null`, absent, or empty when the merchant left it blank.

use serde::{Deserialize, Deserializer};

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    #[serde(default)]
    pub products: Vec<ShopifyProduct>,
}

/// Top-level response from `GET /collections.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyCollectionsResponse {
    #[serde(default)]
    pub collections: Vec<ShopifyCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,

    #[serde(default)]
    pub title: String,

    /// URL slug for the product page (e.g. `"rose-kurta"`).
    pub handle: String,

    #[serde(default)]
    pub body_html: Option<String>,

    /// May be an empty string; treated as absent when building content.
    #[serde(default)]
    pub product_type: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyVariant {
    pub id: i64,

    /// `"Default Title"` for single-variant products.
    #[serde(default)]
    pub title: String,

    /// Decimal string, e.g. `"4500.00"`.
    #[serde(default)]
    pub price: String,

    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCollection {
    pub id: i64,

    #[serde(default)]
    pub title: String,

    pub handle: String,

    #[serde(default)]
    pub body_html: Option<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsRepr {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<TagsRepr>::deserialize(deserializer)?;
    let tags = match raw {
        None => Vec::new(),
        Some(TagsRepr::List(tags)) => tags,
        Some(TagsRepr::Joined(joined)) => joined.split(',').map(str::to_owned).collect(),
    };

    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_json(tags: &str) -> String {
        format!(r#"{{"id": 1, "title": "Rose Kurta", "handle": "rose-kurta", "tags": {tags}, "variants": []}}"#)
    }

    #[test]
    fn tags_accept_json_array() {
        let product: ShopifyProduct = serde_json::from_str(&product_json(r#"["eid", " lawn "]"#)).unwrap();
        assert_eq!(product.tags, vec!["eid", "lawn"]);
    }

    #[test]
    fn tags_accept_comma_separated_string() {
        let product: ShopifyProduct = serde_json::from_str(&product_json(r#""eid, lawn,,summer""#)).unwrap();
        assert_eq!(product.tags, vec!["eid", "lawn", "summer"]);
    }

    #[test]
    fn tags_accept_null_and_empty_string() {
        let product: ShopifyProduct = serde_json::from_str(&product_json("null")).unwrap();
        assert!(product.tags.is_empty());
        let product: ShopifyProduct = serde_json::from_str(&product_json(r#""""#)).unwrap();
        assert!(product.tags.is_empty());
    }

    #[test]
    fn variant_available_defaults_to_true() {
        let variant: ShopifyVariant =
            serde_json::from_str(r#"{"id": 7, "title": "Small", "price": "4500.00"}"#).unwrap();
        assert!(variant.available);
    }

    #[test]
    fn collections_response_tolerates_missing_key() {
        let response: ShopifyCollectionsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.collections.is_empty());
    }
}
