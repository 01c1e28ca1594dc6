use crate::config::ScraperConfig;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::transport::{FetchTransport, HttpTransport, StaticResponse};
use crate::Result;
use rand::Rng;
use std::time::Duration;

/// Inclusive bounds of the randomized pre-request politeness delay
#[derive(Debug, Clone, Copy)]
pub struct DelayBounds {
    pub min_seconds: u64,
    pub max_seconds: u64,
}

impl DelayBounds {
    /// No delay at all; used by tests
    pub fn none() -> Self {
        Self {
            min_seconds: 0,
            max_seconds: 0,
        }
    }
}

/// Fetch gateway: the single road to the network
///
/// Wraps a [`FetchTransport`] with the two policies every request obeys:
/// a randomized politeness delay before each static fetch and a bounded
/// [`RetryPolicy`] for transport failures. The gateway is explicitly
/// injected into discovery and extraction; nothing holds ambient transport
/// state.
pub struct Gateway {
    transport: Box<dyn FetchTransport>,
    policy: RetryPolicy,
    delay: DelayBounds,
}

impl Gateway {
    /// Builds a gateway over the reqwest transport from configuration
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            Box::new(transport),
            RetryPolicy::new(
                config.retry_max_attempts,
                Duration::from_millis(config.retry_backoff_ms),
            ),
            DelayBounds {
                min_seconds: config.delay_min_seconds,
                max_seconds: config.delay_max_seconds,
            },
        ))
    }

    /// Builds a gateway over an arbitrary transport (tests inject fakes here)
    pub fn with_transport(
        transport: Box<dyn FetchTransport>,
        policy: RetryPolicy,
        delay: DelayBounds,
    ) -> Self {
        Self {
            transport,
            policy,
            delay,
        }
    }

    /// Fetches a URL over plain HTTP, pausing politely first and retrying
    /// transport failures per the policy. Non-2xx statuses are returned to
    /// the caller, who decides whether they matter.
    pub async fn fetch_static(&self, url: &str) -> Result<StaticResponse> {
        self.politeness_pause().await;

        let mut attempt = 1;
        loop {
            match self.transport.fetch_static(url).await {
                Ok(response) => return Ok(response),
                Err(err) => match self.policy.backoff_after(attempt) {
                    Some(wait) => {
                        tracing::warn!(
                            "Fetch attempt {} for {} failed ({}), retrying in {:?}",
                            attempt,
                            url,
                            err,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Fetches a URL in a rendered context with the given scroll count,
    /// retrying transport failures per the policy
    pub async fn fetch_rendered(&self, url: &str, scrolls: usize) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.transport.fetch_rendered(url, scrolls).await {
                Ok(body) => return Ok(body),
                Err(err) => match self.policy.backoff_after(attempt) {
                    Some(wait) => {
                        tracing::warn!(
                            "Rendered fetch attempt {} for {} failed ({}), retrying in {:?}",
                            attempt,
                            url,
                            err,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Sleeps a random number of seconds inside the configured bounds
    async fn politeness_pause(&self) {
        if self.delay.max_seconds == 0 {
            return;
        }
        let seconds =
            rand::thread_rng().gen_range(self.delay.min_seconds..=self.delay.max_seconds);
        tracing::debug!("Politeness pause: {}s", seconds);
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }
}
