use std::time::Duration;

/// Bounded retry policy for transport failures
///
/// Policy lives here, not at call sites: the gateway consults one
/// `RetryPolicy` for every fetch instead of scattering sleep loops through
/// the crawler.
///
/// | Attempt | Wait before retry       |
/// |---------|-------------------------|
/// | 1       | backoff                 |
/// | 2       | backoff * 2             |
/// | n       | backoff * 2^(n-1)       |
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per fetch, including the first
    pub max_attempts: u32,

    /// Base wait between attempts, doubled after each failure
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt, no waiting; used by tests
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns how long to wait after the given failed attempt (1-based),
    /// or `None` when the attempt budget is exhausted.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff * 2u32.saturating_pow(attempt - 1))
    }
}
