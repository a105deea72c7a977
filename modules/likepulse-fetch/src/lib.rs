//! Thin I/O fetchers for the external data sources.
//!
//! Every fetcher maps upstream failure (missing key, rate limit, timeout,
//! malformed payload) to an empty result with `error` set. The analysis
//! pipeline never sees an `Err` from this crate.

pub mod newsapi;
pub mod reddit;
pub mod rss;
pub mod youtube;

pub use newsapi::NewsApiFetcher;
pub use reddit::RedditFetcher;
pub use rss::RssFetcher;
pub use youtube::YouTubeFetcher;
