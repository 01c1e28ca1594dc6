//! Extraction rule types
//!
//! All source-specific behavior is expressed as data held by a [`crate::Source`]:
//! which anchors on a listing page are article links, how their hrefs become
//! absolute URLs, and which container/paragraph nodes carry an article body.

/// How a listing anchor's href becomes an absolute article URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinRule {
    /// The href is already absolute
    Absolute,

    /// The href is a relative path to be prefixed with the site origin
    PrefixOrigin(String),
}

/// Rule for extracting article links from a listing document
#[derive(Debug, Clone)]
pub struct LinkRule {
    /// CSS selector matching the article anchors (or their containers,
    /// in which case the first descendant anchor is used)
    pub selector: String,

    /// How matched hrefs are made absolute
    pub join: JoinRule,
}

/// Rule for extracting body text from an article document
#[derive(Debug, Clone)]
pub struct BodyRule {
    /// CSS selector for the container holding the article body
    pub container: String,

    /// CSS selector, relative to the container, for one paragraph
    pub paragraph: String,

    /// Optional selector for a lead block prepended before the paragraphs
    pub lead: Option<String>,
}

impl JoinRule {
    /// Resolves a raw href against this rule, returning the absolute article
    /// URL or `None` when the href is unusable.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        match self {
            JoinRule::Absolute => {
                if href.starts_with("http://") || href.starts_with("https://") {
                    Some(href.to_string())
                } else {
                    None
                }
            }
            JoinRule::PrefixOrigin(origin) => {
                if href.starts_with("http://") || href.starts_with("https://") {
                    // Some listings mix absolute links into an otherwise
                    // relative feed; accept them as-is.
                    Some(href.to_string())
                } else if href.starts_with('/') {
                    Some(format!("{}{}", origin, href))
                } else {
                    None
                }
            }
        }
    }
}
