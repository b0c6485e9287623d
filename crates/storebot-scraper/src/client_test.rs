use super::*;

#[test]
fn products_url_first_page() {
    let url = ShopifyClient::products_url(
        "https://silkandsaffron.store/collections/all",
        250,
        PageRequest::Number(1),
    )
    .unwrap();
    assert_eq!(
        url,
        "https://silkandsaffron.store/products.json?limit=250&page=1"
    );
}

#[test]
fn products_url_with_cursor_omits_page_number() {
    let url = ShopifyClient::products_url(
        "https://silkandsaffron.store/",
        250,
        PageRequest::Cursor("eyJsYXN0X2lkIjo2fQ"),
    )
    .unwrap();
    assert_eq!(
        url,
        "https://silkandsaffron.store/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ"
    );
}

#[test]
fn products_url_bare_domain() {
    let url =
        ShopifyClient::products_url("https://silkandsaffron.store", 50, PageRequest::Number(3))
            .unwrap();
    assert_eq!(
        url,
        "https://silkandsaffron.store/products.json?limit=50&page=3"
    );
}

#[test]
fn products_url_rejects_invalid_origin() {
    let err = ShopifyClient::products_url("not-a-url", 250, PageRequest::Number(1)).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidStoreUrl { .. }),
        "expected InvalidStoreUrl, got: {err:?}"
    );
}

#[test]
fn collections_url_uses_origin() {
    let url =
        ShopifyClient::endpoint_url("https://silkandsaffron.store/pages/about", "collections.json")
            .unwrap();
    assert_eq!(
        url.as_str(),
        "https://silkandsaffron.store/collections.json"
    );
}

#[test]
fn extract_store_origin_strips_path_and_slash() {
    assert_eq!(
        extract_store_origin("https://silkandsaffron.store/collections/all"),
        "https://silkandsaffron.store"
    );
    assert_eq!(
        extract_store_origin("https://silkandsaffron.store/"),
        "https://silkandsaffron.store"
    );
}

#[test]
fn extract_store_origin_keeps_port() {
    assert_eq!(
        extract_store_origin("http://127.0.0.1:4010/"),
        "http://127.0.0.1:4010"
    );
}

#[test]
fn extract_domain_strips_scheme_and_path() {
    assert_eq!(
        extract_domain("https://silkandsaffron.store/products/x"),
        "silkandsaffron.store"
    );
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("silkandsaffron.store"), "silkandsaffron.store");
}
