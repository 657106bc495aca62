//! HTML parser producing [`PageContent`]
//!
//! This module turns a fetched HTML body into the owned structure handed to
//! the traversal core:
//! - the full serialized markup
//! - every `<a>` element in document order, with its text and raw href
//! - whether any `<form>` element exists

use crate::traversal::{LinkCandidate, PageContent};
use scraper::{Html, Selector};

/// Parses an HTML document into [`PageContent`]
///
/// Parsing is lenient: malformed markup still yields a document, so this never
/// fails. The scraper document is dropped before returning, which keeps the
/// result `Send`.
///
/// # Example
///
/// ```
/// use partner_scout::crawler::parse_page;
///
/// let html = r#"<html><body><a href="/partners">Partners</a><form></form></body></html>"#;
/// let page = parse_page(html);
/// assert_eq!(page.links.len(), 1);
/// assert_eq!(page.links[0].href_raw, "/partners");
/// assert!(page.has_form);
/// ```
pub fn parse_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        markup: document.html(),
        links: extract_anchors(&document),
        has_form: has_form(&document),
    }
}

/// Collects anchors in document order
///
/// Anchors without an href are kept with an empty href, so keyword text on
/// them is still seen by the classifier.
fn extract_anchors(document: &Html) -> Vec<LinkCandidate> {
    let Ok(selector) = Selector::parse("a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| {
            let text = element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");

            LinkCandidate {
                visible_text: text,
                href_raw: element.value().attr("href").unwrap_or("").to_string(),
                download: element.value().attr("download").is_some(),
            }
        })
        .collect()
}

fn has_form(document: &Html) -> bool {
    Selector::parse("form")
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}
