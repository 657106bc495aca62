use std::fmt;
use url::Url;

/// The two states a visited task can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalState {
    /// Scanning the page for a partner-candidate link
    Probe,
    /// The page is believed to be a partner page; extract contact data
    Extract,
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => write!(f, "probe"),
            Self::Extract => write!(f, "extract"),
        }
    }
}

/// A unit of crawl work: one URL plus the metadata carried along its path
///
/// Tasks are created either as seeds (depth 0) or as follow-ups of a visited
/// task, which always sit exactly one level deeper than their parent. Fields
/// are read-only once the task exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    url: Url,
    depth: u32,
    is_partner_page: bool,
    source_url: Option<Url>,
}

impl CrawlTask {
    /// Creates a depth-0 probe task for a seed URL
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            depth: 0,
            is_partner_page: false,
            source_url: None,
        }
    }

    /// Follow-up probe task for a link found on this task's page
    pub fn follow_link(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
            is_partner_page: false,
            source_url: None,
        }
    }

    /// Follow-up task for a partner candidate found on this task's page
    pub fn follow_partner(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
            is_partner_page: true,
            source_url: Some(self.url.clone()),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_partner_page(&self) -> bool {
        self.is_partner_page
    }

    /// Page on which the partner link was found, set for partner tasks only
    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }

    pub fn state(&self) -> TraversalState {
        if self.is_partner_page {
            TraversalState::Extract
        } else {
            TraversalState::Probe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_seed_task() {
        let task = CrawlTask::seed(url("https://example.com/"));
        assert_eq!(task.depth(), 0);
        assert!(!task.is_partner_page());
        assert_eq!(task.source_url(), None);
        assert_eq!(task.state(), TraversalState::Probe);
    }

    #[test]
    fn test_follow_ups_increase_depth() {
        let seed = CrawlTask::seed(url("https://example.com/"));
        let child = seed.follow_link(url("https://example.com/about"));
        let partner = child.follow_partner(url("https://example.com/partners"));

        assert_eq!(child.depth(), 1);
        assert_eq!(child.state(), TraversalState::Probe);
        assert_eq!(child.source_url(), None);

        assert_eq!(partner.depth(), 2);
        assert_eq!(partner.state(), TraversalState::Extract);
        assert_eq!(partner.source_url(), Some(child.url()));
    }
}
