//! Source registry: the single extensibility point for site profiles
//!
//! Every site the scraper knows is one [`Source`] entry: a URL pattern, an
//! output bucket, a link rule, a body rule, and a pagination strategy. The
//! [`SourceRegistry`] resolves any URL to its profile with one ordered
//! substring lookup; no other module branches on URLs.

mod registry;
mod rules;

// Re-export main types
pub use registry::{FetchMode, Pagination, Source, SourceRegistry};
pub use rules::{BodyRule, JoinRule, LinkRule};
