//! Link classifier
//!
//! Scans a page's anchors in document order and returns the first one that
//! looks like it leads to a partner program.
//!
//! # Rules
//!
//! 1. A link whose href does not resolve against the page URL is skipped.
//! 2. A link is ignored when its lower-cased raw href, or its resolved host,
//!    contains any ignored-domain entry. This is a substring test, so an
//!    unrelated host such as `github.com.example.org` is ignored as well.
//! 3. A non-ignored link matches when its lower-cased visible text or href
//!    contains any keyword.
//! 4. The first match wins. Later links are never looked at, even if they
//!    would be a better fit.

use crate::config::HeuristicsConfig;
use crate::traversal::page::LinkCandidate;
use crate::url::extract_domain;
use url::Url;

/// Keyword/ignored-domain heuristic with pre-lowered inputs
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    keywords: Vec<String>,
    ignored_domains: Vec<String>,
}

impl LinkClassifier {
    pub fn new(heuristics: &HeuristicsConfig) -> Self {
        Self {
            keywords: lowered(&heuristics.keywords),
            ignored_domains: lowered(&heuristics.ignored_domains),
        }
    }

    /// Returns the resolved URL of the first partner-candidate link, if any
    pub fn classify(&self, links: &[LinkCandidate], page_url: &Url) -> Option<Url> {
        for link in links {
            let Some(resolved) = link.resolve(page_url) else {
                tracing::debug!("Skipping unresolvable href {:?} on {}", link.href_raw, page_url);
                continue;
            };

            let href = link.href_raw.to_lowercase();

            if self.is_ignored(&href, &resolved) {
                tracing::trace!("Ignoring link {} (ignored domain)", resolved);
                continue;
            }

            if self.is_match(&link.visible_text.to_lowercase(), &href) {
                return Some(resolved);
            }
        }

        None
    }

    fn is_ignored(&self, href: &str, resolved: &Url) -> bool {
        let host = extract_domain(resolved);

        self.ignored_domains.iter().any(|domain| {
            href.contains(domain.as_str())
                || host.as_deref().is_some_and(|h| h.contains(domain.as_str()))
        })
    }

    fn is_match(&self, text: &str, href: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| text.contains(keyword.as_str()) || href.contains(keyword.as_str()))
    }
}

/// One-shot classification without keeping a [`LinkClassifier`] around
///
/// # Example
///
/// ```
/// use partner_scout::config::HeuristicsConfig;
/// use partner_scout::traversal::{classify, LinkCandidate};
/// use url::Url;
///
/// let page = Url::parse("https://example.com").unwrap();
/// let links = vec![
///     LinkCandidate::new("Blog", "/blog"),
///     LinkCandidate::new("Affiliate Program", "/partners"),
/// ];
///
/// let found = classify(&links, &page, &HeuristicsConfig::default());
/// assert_eq!(found.unwrap().as_str(), "https://example.com/partners");
/// ```
pub fn classify(
    links: &[LinkCandidate],
    page_url: &Url,
    heuristics: &HeuristicsConfig,
) -> Option<Url> {
    LinkClassifier::new(heuristics).classify(links, page_url)
}

fn lowered(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}
