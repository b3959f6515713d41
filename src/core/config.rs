use crate::core::error::{AppError, AppResult};
use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;

/// Configuration constants for the mirror service

/// Path to the SQLite database file
/// Read once at startup from DATABASE_PATH or defaults to "feedmirror.sqlite"
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "feedmirror.sqlite".to_string()));

/// Path to the log file
/// Read from LOG_FILE_PATH or defaults to "feedmirror.log"
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "feedmirror.log".to_string()));

/// Scheduler configuration
pub mod scheduler {
    use once_cell::sync::Lazy;

    /// Seconds between Instagram fetch runs (default: 15 minutes)
    pub static INSTAGRAM_CHECK_INTERVAL_SECS: Lazy<u64> = Lazy::new(|| {
        std::env::var("INSTAGRAM_CHECK_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900)
    });

    /// Seconds between YouTube refresh runs (default: 1 hour)
    pub static YOUTUBE_CHECK_INTERVAL_SECS: Lazy<u64> = Lazy::new(|| {
        std::env::var("YOUTUBE_CHECK_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600)
    });
}

/// Network configuration
pub mod network {
    use std::time::Duration;

    /// Request timeout for external API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Connect timeout for external API calls (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

fn require_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Config(format!("{} is not set", name)))
}

/// Configuration for the Instagram fetch workflow.
///
/// Threaded explicitly into the fetcher entry point — the account handle and
/// credentials are never read from globals mid-run.
#[derive(Debug, Clone)]
pub struct InstagramConfig {
    /// Account handle to mirror (without the leading `@`)
    pub account: String,
    /// Login for the private API session
    pub login: String,
    /// Password for the private API session
    pub password: SecretString,
    /// Maximum number of feed items to consider per run
    pub max_posts: usize,
}

impl InstagramConfig {
    /// Build from INSTAGRAM_ACCOUNT / INSTAGRAM_LOGIN / INSTAGRAM_PASSWORD /
    /// INSTAGRAM_MAX_POSTS (default 3).
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            account: require_env("INSTAGRAM_ACCOUNT")?,
            login: require_env("INSTAGRAM_LOGIN")?,
            password: SecretString::from(require_env("INSTAGRAM_PASSWORD")?),
            max_posts: env::var("INSTAGRAM_MAX_POSTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }
}

/// Configuration for the YouTube refresh workflow.
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    /// YouTube Data API v3 key
    pub api_key: String,
    /// Maximum number of stored videos to refresh per run
    pub max_videos: usize,
}

impl YoutubeConfig {
    /// Build from YOUTUBE_API_KEY / YOUTUBE_MAX_VIDEOS (default 3).
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            api_key: require_env("YOUTUBE_API_KEY")?,
            max_videos: env::var("YOUTUBE_MAX_VIDEOS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }
}
