//! Contact extraction for partner pages

use crate::traversal::page::PageContent;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;
use url::Url;

/// Display value for a record without any email address
pub const NO_EMAILS_FOUND: &str = "Not found";

const EMAIL_PATTERN: &str = r"(?i)[a-z0-9._-]+@[a-z0-9._-]+\.[a-z0-9._-]+";

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Contact signals found on one partner page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Page on which the partner link was found
    pub source_url: Url,
    /// The partner page itself
    pub partner_page_url: Url,
    /// Distinct email-like strings found anywhere in the markup
    pub found_emails: BTreeSet<String>,
    /// The page contains at least one `<form>`
    pub contact_form_exists: bool,
}

impl ResultRecord {
    /// Emails joined with `", "`, or [`NO_EMAILS_FOUND`]
    pub fn emails_display(&self) -> String {
        if self.found_emails.is_empty() {
            NO_EMAILS_FOUND.to_string()
        } else {
            self.found_emails
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    pub fn contact_form_display(&self) -> &'static str {
        if self.contact_form_exists {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Builds a result record from raw page markup
///
/// The whole markup is scanned for email addresses, not just visible text, so
/// addresses inside attributes (`mailto:` links, data attributes) count too.
/// Never fails: missing emails or forms are ordinary values.
pub fn extract(page_markup: &str, partner_page_url: &Url, source_url: &Url) -> ResultRecord {
    let document = Html::parse_document(page_markup);
    let has_form = match Selector::parse("form") {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    };

    build_record(page_markup, has_form, partner_page_url, source_url)
}

/// Builds a result record from an already parsed page
pub fn extract_from_page(
    page: &PageContent,
    partner_page_url: &Url,
    source_url: &Url,
) -> ResultRecord {
    build_record(&page.markup, page.has_form, partner_page_url, source_url)
}

fn build_record(
    markup: &str,
    has_form: bool,
    partner_page_url: &Url,
    source_url: &Url,
) -> ResultRecord {
    let found_emails = email_regex()
        .find_iter(markup)
        .map(|m| m.as_str().to_string())
        .collect();

    ResultRecord {
        source_url: source_url.clone(),
        partner_page_url: partner_page_url.clone(),
        found_emails,
        contact_form_exists: has_form,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> (Url, Url) {
        (
            Url::parse("https://example.com/partners").unwrap(),
            Url::parse("https://example.com").unwrap(),
        )
    }

    #[test]
    fn test_duplicate_emails_collapse() {
        let (partner, source) = urls();
        let html = r#"<html><body>
            <p>Write to contact@example.com</p>
            <a href="mailto:contact@example.com">contact@example.com</a>
        </body></html>"#;

        let record = extract(html, &partner, &source);
        assert_eq!(record.found_emails.len(), 1);
        assert!(record.found_emails.contains("contact@example.com"));
        assert_eq!(record.emails_display(), "contact@example.com");
    }

    #[test]
    fn test_multiple_emails_joined() {
        let (partner, source) = urls();
        let html = "<p>partners@acme.io or affiliates@acme.io</p>";

        let record = extract(html, &partner, &source);
        assert_eq!(record.found_emails.len(), 2);
        assert_eq!(record.emails_display(), "affiliates@acme.io, partners@acme.io");
    }

    #[test]
    fn test_emails_in_attributes_are_found() {
        let (partner, source) = urls();
        let html = r#"<div data-contact="team@sub.example.org"></div>"#;

        let record = extract(html, &partner, &source);
        assert!(record.found_emails.contains("team@sub.example.org"));
    }

    #[test]
    fn test_no_emails_uses_sentinel() {
        let (partner, source) = urls();
        let record = extract("<p>Nothing to see</p>", &partner, &source);
        assert!(record.found_emails.is_empty());
        assert_eq!(record.emails_display(), NO_EMAILS_FOUND);
    }

    #[test]
    fn test_form_detection() {
        let (partner, source) = urls();

        let with_form = extract(
            r#"<form action="/apply"><input name="email"></form>"#,
            &partner,
            &source,
        );
        assert!(with_form.contact_form_exists);
        assert_eq!(with_form.contact_form_display(), "Yes");

        let without_form = extract("<div>Apply by email</div>", &partner, &source);
        assert!(!without_form.contact_form_exists);
        assert_eq!(without_form.contact_form_display(), "No");
    }

    #[test]
    fn test_urls_are_carried_over() {
        let (partner, source) = urls();
        let record = extract("", &partner, &source);
        assert_eq!(record.partner_page_url, partner);
        assert_eq!(record.source_url, source);
    }

    #[test]
    fn test_extract_from_parsed_page() {
        let (partner, source) = urls();
        let page = PageContent {
            markup: "<p>join@example.com</p>".to_string(),
            links: Vec::new(),
            has_form: true,
        };

        let record = extract_from_page(&page, &partner, &source);
        assert!(record.contact_form_exists);
        assert_eq!(record.emails_display(), "join@example.com");
    }
}
