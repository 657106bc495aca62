use crate::config::FanOutScope;
use crate::url::{is_http, same_host};
use url::Url;

/// One anchor element as it appears on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Concatenated text content of the anchor
    pub visible_text: String,
    /// The raw `href` attribute, empty when absent
    pub href_raw: String,
    /// Anchor carries a `download` attribute
    pub download: bool,
}

impl LinkCandidate {
    pub fn new(visible_text: impl Into<String>, href_raw: impl Into<String>) -> Self {
        Self {
            visible_text: visible_text.into(),
            href_raw: href_raw.into(),
            download: false,
        }
    }

    /// Resolves the raw href against the page URL
    ///
    /// Returns `None` when the href cannot be turned into an absolute URL.
    pub fn resolve(&self, page_url: &Url) -> Option<Url> {
        page_url.join(self.href_raw.trim()).ok()
    }
}

/// Parsed content of a fetched page, as handed to the traversal core
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Full serialized markup of the document
    pub markup: String,
    /// Anchor elements in document order
    pub links: Vec<LinkCandidate>,
    /// At least one `<form>` element exists
    pub has_form: bool,
}

impl PageContent {
    /// Resolves the page's links into URLs worth fetching
    ///
    /// **Excluded:**
    /// - empty and fragment-only hrefs
    /// - `javascript:`, `mailto:`, `tel:` and `data:` links
    /// - `<a download>` links
    /// - anything that does not resolve to http(s)
    /// - other hosts, when `scope` is [`FanOutScope::SameHostname`]
    ///
    /// Duplicates are kept; deduplication belongs to the work queue.
    pub fn outbound_links(&self, page_url: &Url, scope: FanOutScope) -> Vec<Url> {
        self.links
            .iter()
            .filter(|link| !link.download && is_followable_href(&link.href_raw))
            .filter_map(|link| link.resolve(page_url))
            .filter(is_http)
            .filter(|url| match scope {
                FanOutScope::All => true,
                FanOutScope::SameHostname => same_host(url, page_url),
            })
            .collect()
    }
}

fn is_followable_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn page(hrefs: &[&str]) -> PageContent {
        PageContent {
            links: hrefs.iter().map(|h| LinkCandidate::new("x", *h)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_relative() {
        let link = LinkCandidate::new("Partners", "/partners");
        assert_eq!(
            link.resolve(&base_url()).unwrap().as_str(),
            "https://example.com/partners"
        );
    }

    #[test]
    fn test_resolve_invalid() {
        let link = LinkCandidate::new("Broken", "http://[::1");
        assert_eq!(link.resolve(&base_url()), None);
    }

    #[test]
    fn test_outbound_links_skip_special_schemes() {
        let page = page(&[
            "/valid",
            "javascript:void(0)",
            "mailto:test@example.com",
            "tel:+1234567890",
            "#section",
            "",
            "https://other.com/x",
        ]);
        let links = page.outbound_links(&base_url(), FanOutScope::All);
        let links: Vec<&str> = links.iter().map(|u| u.as_str()).collect();
        assert_eq!(links, vec!["https://example.com/valid", "https://other.com/x"]);
    }

    #[test]
    fn test_outbound_links_skip_download() {
        let mut page = page(&["/file.pdf", "/page"]);
        page.links[0].download = true;
        let links = page.outbound_links(&base_url(), FanOutScope::All);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/page");
    }

    #[test]
    fn test_outbound_links_same_hostname() {
        let page = page(&["/a", "https://other.com/b", "https://EXAMPLE.com/c"]);
        let links = page.outbound_links(&base_url(), FanOutScope::SameHostname);
        let links: Vec<&str> = links.iter().map(|u| u.as_str()).collect();
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/c"]);
    }
}
