//! YouTube video mirroring: Data API client, the video record and its
//! diff-and-update workflow.

pub mod client;
pub mod db;
pub mod updater;
pub mod video;

pub use client::{VideoSnippet, YoutubeClient};
pub use updater::{refresh_all, RefreshStats};
pub use video::{RemoteOutcome, YoutubeVideo};
