//! Reddit signal retrieval for the idea pipeline.
//!
//! Live retrieval runs client-credentials OAuth against the public Reddit
//! API, one hot listing per configured channel with a politeness delay in
//! between. When credentials are absent or every channel fails, a local
//! static fixture stands in so the pipeline always has input to work with.
//!
//! The access token is cached per client instance and refreshed ahead of
//! expiry; base URLs are constructor-injected so tests run against
//! `wiremock` instead of the real endpoints.

pub mod client;
pub mod error;
pub mod fixture;
pub mod source;

pub use client::RedditClient;
pub use error::RedditError;
pub use fixture::load_fixture_signals;
pub use source::{sample_signals, RedditSource};
