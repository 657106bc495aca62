//! URL handling module for Partner-Scout
//!
//! This module provides URL normalization for work-queue deduplication and a
//! few host helpers shared by the classifier and the crawl driver.

mod normalize;

use url::Url;

pub use normalize::normalize_url;

/// Extracts the lower-cased host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use partner_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL can be fetched by the crawler
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Returns true if both URLs point at the same host (case-insensitive)
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        let url = Url::parse("https://Blog.Example.com:8080/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));

        let url = Url::parse("mailto:join@example.com").unwrap();
        assert_eq!(extract_domain(&url), None);
    }

    #[test]
    fn test_is_http() {
        assert!(is_http(&Url::parse("http://example.com/").unwrap()));
        assert!(is_http(&Url::parse("https://example.com/").unwrap()));
        assert!(!is_http(&Url::parse("mailto:a@example.com").unwrap()));
        assert!(!is_http(&Url::parse("ftp://example.com/").unwrap()));
    }

    #[test]
    fn test_same_host() {
        let a = Url::parse("https://example.com/a").unwrap();
        let b = Url::parse("http://EXAMPLE.com/b?x=1").unwrap();
        let c = Url::parse("https://sub.example.com/").unwrap();
        assert!(same_host(&a, &b));
        assert!(!same_host(&a, &c));
    }
}
