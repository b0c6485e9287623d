use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Kind of storefront page a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Product,
    Collection,
    Page,
}

impl PageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Product => "product",
            PageType::Collection => "collection",
            PageType::Page => "page",
        }
    }

    /// Infers the page type from a storefront URL path.
    ///
    /// `/products/` wins over `/collections/` so that
    /// `/collections/sale/products/x` is still a product.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        if url.contains("/products/") {
            PageType::Product
        } else if url.contains("/collections/") {
            PageType::Collection
        } else {
            PageType::Page
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(PageType::Product),
            "collection" => Ok(PageType::Collection),
            "page" => Ok(PageType::Page),
            other => Err(CoreError::InvalidPageType(other.to_string())),
        }
    }
}

/// One stored unit of scraped site content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical storefront URL; unique across the store.
    pub url: String,
    pub title: Option<String>,
    /// Structured fields flattened into text, e.g.
    /// `"Product: Rose Kurta\n\nPrice: Rs.4500.00\n\nStatus: Available"`.
    pub content: String,
    pub page_type: PageType,
    /// Soft-delete flag; inactive pages are never matched.
    pub is_active: bool,
    pub last_scraped: DateTime<Utc>,
}

impl PageRecord {
    /// Title for display, falling back to the URL when the page has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.url)
    }
}

/// Write-side shape of a page. Upserting a draft marks the page active and
/// stamps `last_scraped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDraft {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    pub page_type: PageType,
}

impl PageDraft {
    #[must_use]
    pub fn into_record(self, last_scraped: DateTime<Utc>) -> PageRecord {
        PageRecord {
            url: self.url,
            title: self.title,
            content: self.content,
            page_type: self.page_type,
            is_active: true,
            last_scraped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_round_trips_through_str() {
        for page_type in [PageType::Product, PageType::Collection, PageType::Page] {
            let parsed: PageType = page_type.as_str().parse().unwrap();
            assert_eq!(parsed, page_type);
        }
    }

    #[test]
    fn page_type_parse_is_case_insensitive() {
        assert_eq!("Product".parse::<PageType>().unwrap(), PageType::Product);
        assert_eq!(" PAGE ".parse::<PageType>().unwrap(), PageType::Page);
    }

    #[test]
    fn page_type_parse_rejects_unknown() {
        let err = "blog".parse::<PageType>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPageType(ref t) if t == "blog"));
    }

    #[test]
    fn page_type_from_url() {
        assert_eq!(
            PageType::from_url("https://shop.example/products/rose-kurta"),
            PageType::Product
        );
        assert_eq!(
            PageType::from_url("https://shop.example/collections/eid"),
            PageType::Collection
        );
        assert_eq!(
            PageType::from_url("https://shop.example/collections/eid/products/rose-kurta"),
            PageType::Product
        );
        assert_eq!(PageType::from_url("https://shop.example/"), PageType::Page);
    }

    #[test]
    fn page_type_serializes_lowercase() {
        let json = serde_json::to_string(&PageType::Collection).unwrap();
        assert_eq!(json, "\"collection\"");
    }

    #[test]
    fn display_name_falls_back_to_url() {
        let mut record = PageDraft {
            url: "https://shop.example/products/x".to_string(),
            title: Some("  ".to_string()),
            content: String::new(),
            page_type: PageType::Product,
        }
        .into_record(Utc::now());
        assert_eq!(record.display_name(), "https://shop.example/products/x");

        record.title = Some("Rose Kurta".to_string());
        assert_eq!(record.display_name(), "Rose Kurta");
    }

    #[test]
    fn draft_into_record_is_active() {
        let record = PageDraft {
            url: "u".to_string(),
            title: None,
            content: "c".to_string(),
            page_type: PageType::Page,
        }
        .into_record(Utc::now());
        assert!(record.is_active);
    }
}
