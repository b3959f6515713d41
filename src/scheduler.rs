//! Background scheduler that periodically runs the mirror workflows.
//!
//! One `tokio::spawn`ed loop per configured workflow. A failed cycle is
//! logged and the loop continues; nothing short of process shutdown stops
//! the tickers.

use crate::core::config::{self, InstagramConfig, YoutubeConfig};
use crate::storage::DbPool;
use crate::{instagram, youtube};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

/// Start the background loops for every configured workflow.
///
/// Returns the spawned task handles so the caller can keep the process
/// alive (or abort on shutdown).
pub fn start(
    pool: Arc<DbPool>,
    instagram_config: Option<InstagramConfig>,
    youtube_config: Option<YoutubeConfig>,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if let Some(cfg) = instagram_config {
        let pool = Arc::clone(&pool);
        let secs = *config::scheduler::INSTAGRAM_CHECK_INTERVAL_SECS;
        log::info!(
            "Instagram fetch loop started for @{} (interval: {}s)",
            cfg.account,
            secs
        );
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                if let Err(e) = instagram::fetcher::run(&cfg, &pool).await {
                    log::error!("Instagram fetch cycle failed: {}", e);
                }
            }
        }));
    } else {
        log::warn!("Instagram credentials not configured, fetch loop disabled");
    }

    if let Some(cfg) = youtube_config {
        let pool = Arc::clone(&pool);
        let secs = *config::scheduler::YOUTUBE_CHECK_INTERVAL_SECS;
        log::info!("YouTube refresh loop started (interval: {}s)", secs);
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                if let Err(e) = youtube::refresh_all(&cfg, &pool).await {
                    log::error!("YouTube refresh cycle failed: {}", e);
                }
            }
        }));
    } else {
        log::warn!("YouTube API key not configured, refresh loop disabled");
    }

    handles
}
