//! Store URL helpers.

/// Scheme and host of a store URL, without a trailing slash.
///
/// `"https://silkandsaffron.store/collections/all"` becomes
/// `"https://silkandsaffron.store"`, so catalog endpoints are always requested
/// from the store root.
#[must_use]
pub fn extract_store_origin(store_url: &str) -> String {
    reqwest::Url::parse(store_url).map_or_else(
        |e| {
            tracing::warn!(
                store_url,
                error = %e,
                "store URL does not parse; falling back to string split for origin"
            );
            store_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Hostname for error messages; the input itself when it does not parse.
pub(super) fn extract_domain(store_url: &str) -> String {
    reqwest::Url::parse(store_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| store_url.to_owned())
}
