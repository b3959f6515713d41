//! Refresh cycle over the stored video records.

use crate::core::config::YoutubeConfig;
use crate::core::error::AppResult;
use crate::storage::{get_connection, DbPool};
use crate::youtube::client::YoutubeClient;
use crate::youtube::db;

/// Counts from one refresh run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub refreshed: usize,
    pub failed: usize,
}

/// Refresh every visible video (up to `max_videos`) against the remote
/// source. Per-video failures are logged inside `update_from_youtube` and
/// counted; they never abort the cycle.
///
/// The listing connection is scoped to its query and each video takes its
/// own connection after its remote call, so the future holds no
/// `Connection` across an await and stays `Send`.
pub async fn refresh_all(config: &YoutubeConfig, pool: &DbPool) -> AppResult<RefreshStats> {
    let client = YoutubeClient::new(config.api_key.clone())?;
    let videos = {
        let conn = get_connection(pool)?;
        db::list_visible_videos(&conn, config.max_videos)?
    };

    let mut stats = RefreshStats::default();
    for mut video in videos {
        if video.update_from_youtube(&client, pool).await {
            stats.refreshed += 1;
        } else {
            stats.failed += 1;
        }
    }

    log::info!(
        "YouTube refresh: {} refreshed, {} failed",
        stats.refreshed,
        stats.failed
    );
    Ok(stats)
}
