use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

use feedmirror::cli::{Cli, Commands};
use feedmirror::core::{config, init_logger, InstagramConfig, YoutubeConfig};
use feedmirror::storage::{create_pool, get_connection, DbPool};
use feedmirror::{instagram, scheduler, youtube};

/// Main entry point for the mirror service
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, config).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config is read
    let _ = dotenv();

    let cli = Cli::parse_args();

    init_logger(&config::LOG_FILE_PATH)?;

    let pool = create_pool(&config::DATABASE_PATH)?;

    match cli.command {
        None | Some(Commands::Run) => run_scheduler(pool).await,
        Some(Commands::FetchInstagram) => {
            let cfg = InstagramConfig::from_env()?;
            let stored = instagram::fetcher::run(&cfg, &pool).await?;
            log::info!("Fetched {} new post(s)", stored.len());
            Ok(())
        }
        Some(Commands::RefreshYoutube { limit }) => {
            let mut cfg = YoutubeConfig::from_env()?;
            if let Some(limit) = limit {
                cfg.max_videos = limit;
            }
            let stats = youtube::refresh_all(&cfg, &pool).await?;
            log::info!("Refreshed {}, failed {}", stats.refreshed, stats.failed);
            Ok(())
        }
        Some(Commands::AddVideo { video_id }) => add_video(&pool, &video_id).await,
    }
}

/// Run both mirror loops until the process receives Ctrl-C.
async fn run_scheduler(pool: DbPool) -> Result<()> {
    // A workflow with missing configuration is disabled, not fatal — the
    // two mirrors are independent.
    let instagram_config = match InstagramConfig::from_env() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };
    let youtube_config = match YoutubeConfig::from_env() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };

    let handles = scheduler::start(Arc::new(pool), instagram_config, youtube_config);
    if handles.is_empty() {
        anyhow::bail!("no workflow configured, nothing to do");
    }

    tokio::signal::ctrl_c().await?;
    log::info!("Shutdown signal received, stopping");
    for handle in handles {
        handle.abort();
    }
    Ok(())
}

/// Register a video by id: pull its current snippet and insert the row.
async fn add_video(pool: &DbPool, video_id: &str) -> Result<()> {
    let cfg = YoutubeConfig::from_env()?;
    let client = youtube::YoutubeClient::new(cfg.api_key)?;

    let snippet = client
        .video_snippet(video_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("video {} not found upstream", video_id))?;

    let conn = get_connection(pool)?;
    let payload = serde_json::json!({
        "description": snippet.description,
        "thumbnail": snippet.thumbnail_url,
    });
    youtube::db::insert_video(
        &conn,
        video_id,
        &snippet.title,
        &snippet.channel_id,
        &snippet.published_at,
        Some(&payload),
    )?;

    log::info!("Registered video {} ({})", video_id, snippet.title);
    Ok(())
}
