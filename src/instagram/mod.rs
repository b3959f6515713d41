//! Instagram post mirroring: private-API client, feed model and the
//! fetch-dedupe-persist workflow.

pub mod client;
pub mod db;
pub mod feed;
pub mod fetcher;

pub use client::{InstagramClient, InstagramSession, UserFeed};
pub use feed::{classify_media, FeedItem, MediaItem, PostPayload};
pub use fetcher::NewPost;
