pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use config::Config;
pub use error::LikepulseError;
pub use sources::{DiscussionSource, FeedSource, NewsSource, VideoSource};
pub use types::*;
