//! Article extraction
//!
//! Fetches one article document and applies the source's body rule: select
//! the container, collect the text of each paragraph node in order (with the
//! lead block first when the source declares one), and join the blocks with
//! newlines. A missing container or empty paragraphs are not errors; they
//! just contribute nothing.

use crate::fetch::Gateway;
use crate::sources::{BodyRule, FetchMode, Source};
use crate::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

/// Fetches an article and returns its extracted body text
///
/// Transport failures propagate so the caller can decide the skip policy;
/// structural mismatches do not (the result is simply shorter or empty).
pub async fn extract_article(gateway: &Gateway, source: &Source, url: &str) -> Result<String> {
    let document = match source.fetch_mode {
        FetchMode::Static => {
            let response = gateway.fetch_static(url).await?;
            if !response.is_success() {
                return Err(ScrapeError::Transport {
                    url: url.to_string(),
                    message: format!("HTTP {}", response.status),
                });
            }
            response.body
        }
        // Article pages need no scrolling; one render pass suffices
        FetchMode::Rendered => gateway.fetch_rendered(url, 0).await?,
    };

    Ok(extract_body(&document, &source.body_rule))
}

/// Applies a body rule to an article document
///
/// Returns the newline-joined text blocks, or an empty string when the
/// expected container is absent.
pub fn extract_body(html: &str, rule: &BodyRule) -> String {
    let document = Html::parse_document(html);

    let Ok(container_selector) = Selector::parse(&rule.container) else {
        tracing::warn!("Unparseable body container selector: {}", rule.container);
        return String::new();
    };
    let Some(container) = document.select(&container_selector).next() else {
        return String::new();
    };

    let mut blocks = Vec::new();

    if let Some(lead_selector) = &rule.lead {
        if let Ok(selector) = Selector::parse(lead_selector) {
            if let Some(lead) = container.select(&selector).next() {
                push_text(&mut blocks, lead);
            }
        }
    }

    if let Ok(paragraph_selector) = Selector::parse(&rule.paragraph) {
        for paragraph in container.select(&paragraph_selector) {
            push_text(&mut blocks, paragraph);
        }
    }

    blocks.join("\n")
}

/// Collects an element's text, keeping it only if non-empty after trimming
fn push_text(blocks: &mut Vec<String>, element: ElementRef<'_>) {
    let text = element.text().collect::<String>().trim().to_string();
    if !text.is_empty() {
        blocks.push(text);
    }
}
