//! Fetch gateway module
//!
//! This module owns everything between the pipeline and the network:
//! - The [`FetchTransport`] trait (static HTTP and rendered-with-scrolls)
//! - The reqwest-backed [`HttpTransport`]
//! - The [`Gateway`] applying politeness delay and bounded retry

mod gateway;
mod retry;
mod transport;

pub use gateway::{DelayBounds, Gateway};
pub use retry::RetryPolicy;
pub use transport::{FetchTransport, HttpTransport, StaticResponse};
