use crate::sources::rules::{BodyRule, JoinRule, LinkRule};
use crate::{Result, ScrapeError};

/// How a source's pages are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP GET
    Static,

    /// Scripted browser fetch (the listing only exists after rendering)
    Rendered,
}

/// How a source's full article list is obtained from its listing page(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// The listing page is fetched once
    None,

    /// The listing is spread over `listing?page=N` pages of a known size;
    /// progress is checkpointed so a resumed run skips fetched pages
    CountedPages { page_size: usize },

    /// The listing grows under incremental scrolling; one rendered fetch
    /// issues `target / articles_per_scroll` scrolls
    ScrollCount { articles_per_scroll: usize },
}

/// A registered site profile
///
/// Identity is the `pattern` key: a URL substring checked in registration
/// order, first match wins. Everything the crawler and the article parser
/// need to know about a site lives here as data, so adding a source means
/// adding a table entry, not a branch.
#[derive(Debug, Clone)]
pub struct Source {
    /// URL substring identifying this source
    pub pattern: String,

    /// Output bucket directory name
    pub bucket: String,

    /// Fetch mode for both listing and article pages
    pub fetch_mode: FetchMode,

    /// Listing pagination strategy
    pub pagination: Pagination,

    /// Rule extracting article links from listing documents
    pub link_rule: LinkRule,

    /// Rule extracting body text from article documents
    pub body_rule: BodyRule,
}

/// Ordered lookup table of registered sources
///
/// Matching is substring containment evaluated in a fixed priority order
/// because some patterns are substrings of others; registry content is fixed
/// at startup.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Creates a registry from an explicit source list, preserving order
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// The built-in source table
    pub fn builtin() -> Self {
        Self::new(vec![
            Source {
                pattern: "//iz".to_string(),
                bucket: "Izvestiya_articles".to_string(),
                fetch_mode: FetchMode::Static,
                pagination: Pagination::CountedPages { page_size: 25 },
                link_rule: LinkRule {
                    selector: "a.lenta_news__day__list__item".to_string(),
                    join: JoinRule::PrefixOrigin("https://iz.ru".to_string()),
                },
                body_rule: BodyRule {
                    container: r#"div[itemprop="articleBody"]"#.to_string(),
                    paragraph: "p".to_string(),
                    lead: None,
                },
            },
            Source {
                pattern: "//rg".to_string(),
                bucket: "RG_articles".to_string(),
                fetch_mode: FetchMode::Rendered,
                pagination: Pagination::ScrollCount {
                    articles_per_scroll: 10,
                },
                link_rule: LinkRule {
                    selector: "div.PageNewsContent_item__ZDNam a".to_string(),
                    join: JoinRule::PrefixOrigin("https://rg.ru".to_string()),
                },
                body_rule: BodyRule {
                    // The body container on rg.ru is an anonymous div; the
                    // lead paragraph carries its own class and goes first.
                    container: r#"div[class=""]"#.to_string(),
                    paragraph: "p".to_string(),
                    lead: Some("div.PageArticleContent_lead__gvX5C".to_string()),
                },
            },
            Source {
                pattern: "mk.ru".to_string(),
                bucket: "MK_articles".to_string(),
                fetch_mode: FetchMode::Rendered,
                pagination: Pagination::ScrollCount {
                    articles_per_scroll: 1,
                },
                link_rule: LinkRule {
                    selector: "a.news-listing__item-link".to_string(),
                    join: JoinRule::Absolute,
                },
                body_rule: BodyRule {
                    container: r#"div[itemprop="articleBody"]"#.to_string(),
                    paragraph: "p".to_string(),
                    lead: None,
                },
            },
        ])
    }

    /// Resolves a URL to its source profile
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnknownSource`] when no registered pattern is
    /// contained in `url`.
    pub fn resolve(&self, url: &str) -> Result<&Source> {
        self.sources
            .iter()
            .find(|source| url.contains(&source.pattern))
            .ok_or_else(|| ScrapeError::UnknownSource {
                url: url.to_string(),
            })
    }

    /// Returns all registered sources in priority order
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }
}
