//! Fetch transport boundary
//!
//! The crawler never talks to the network directly: it goes through the
//! [`FetchTransport`] trait, so tests substitute canned documents and a
//! future browser-backed transport can slot in without touching the
//! pipeline. The shipped implementation is plain reqwest; for rendered
//! fetches it degrades to a single GET of the unscrolled page, since real
//! browser rendering is an external capability.

use crate::config::ScraperConfig;
use crate::{ConfigError, Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Response of a static fetch: status code plus decoded body
#[derive(Debug, Clone)]
pub struct StaticResponse {
    pub status: u16,
    pub body: String,
}

impl StaticResponse {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw fetch capability consumed by the crawl pipeline
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Fetches a URL over plain HTTP, returning status and body.
    /// Non-2xx responses are returned, not errors; only transport-level
    /// failures (timeout, connection refused) are `Err`.
    async fn fetch_static(&self, url: &str) -> Result<StaticResponse>;

    /// Fetches a URL in a rendered browser context, scrolling `scrolls`
    /// times before returning the final document.
    async fn fetch_rendered(&self, url: &str, scrolls: usize) -> Result<String>;
}

/// Reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    encoding: String,
}

impl HttpTransport {
    /// Builds a transport from the scraper configuration: default headers,
    /// request timeout, and the charset fallback used when a page omits its
    /// encoding.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name: HeaderName = name
                .parse()
                .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
            let value: HeaderValue = value
                .parse()
                .map_err(|_| ConfigError::InvalidHeader(value.clone()))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ScrapeError::Transport {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            encoding: config.encoding.clone(),
        })
    }
}

#[async_trait]
impl FetchTransport for HttpTransport {
    async fn fetch_static(&self, url: &str) -> Result<StaticResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .text_with_charset(&self.encoding)
            .await
            .map_err(|e| ScrapeError::transport(url, &e))?;

        Ok(StaticResponse { status, body })
    }

    async fn fetch_rendered(&self, url: &str, scrolls: usize) -> Result<String> {
        // No browser attached to this transport; the unscrolled document is
        // the best available rendition.
        if scrolls > 0 {
            tracing::debug!(
                "Rendered fetch of {} requested {} scrolls; plain HTTP transport returns the initial document",
                url,
                scrolls
            );
        }

        let response = self.fetch_static(url).await?;
        if !response.is_success() {
            return Err(ScrapeError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", response.status),
            });
        }
        Ok(response.body)
    }
}
