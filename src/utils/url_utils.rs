//! URL helpers shared by the config layer and the HTTP surface.

use url::Url;

/// Check that a string is a fetchable http(s) URL.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
        }
        Err(_) => false,
    }
}

/// Normalize a configured base URL to `scheme://host` form without a
/// trailing slash.
///
/// Bare hostnames get an `https://` prefix so operators can configure
/// `otakudesu.best` and `https://otakudesu.best` interchangeably.
#[must_use]
pub fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    with_scheme.trim_end_matches('/').to_string()
}
