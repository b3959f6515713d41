//! YouTube Data API v3 client (videos endpoint, snippet part only).

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use serde_json::Value;
use url::Url;

/// Data API base for the `videos` endpoint.
const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// The slice of remote video metadata the mirror cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub published_at: String,
    pub thumbnail_url: String,
}

impl VideoSnippet {
    /// Parse a `snippet` object from the Data API response.
    pub fn from_json(snippet: &Value) -> Option<VideoSnippet> {
        Some(VideoSnippet {
            title: snippet.get("title")?.as_str()?.to_string(),
            description: snippet
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            channel_id: snippet
                .get("channelId")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            published_at: snippet
                .get("publishedAt")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            thumbnail_url: snippet
                .pointer("/thumbnails/high/url")
                .or_else(|| snippet.pointer("/thumbnails/default/url"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        })
    }
}

pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(api_key: String) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config::network::timeout())
            .connect_timeout(config::network::connect_timeout())
            .build()?;
        Ok(Self { http, api_key })
    }

    /// Fetch current metadata for a video by its external id.
    ///
    /// Returns `Ok(None)` when the remote video no longer exists (the API
    /// responds with an empty `items` array).
    pub async fn video_snippet(&self, video_id: &str) -> AppResult<Option<VideoSnippet>> {
        let url = Url::parse_with_params(
            VIDEOS_ENDPOINT,
            &[("part", "snippet"), ("id", video_id), ("key", &self.api_key)],
        )?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Youtube(format!(
                "videos endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;
        Ok(body.pointer("/items/0/snippet").and_then(VideoSnippet::from_json))
    }
}
