//! The fetch-dedupe-persist workflow for Instagram posts.
//!
//! One run: login, resolve the configured account to a user id, pull the
//! most recent feed page, then store every item not already present. The
//! feed arrives reverse-chronological; items are processed oldest-first so
//! sequential row ids follow natural posting order.

use crate::core::config::InstagramConfig;
use crate::core::error::AppResult;
use crate::instagram::client::InstagramClient;
use crate::instagram::db;
use crate::instagram::feed::{FeedItem, PostPayload};
use crate::storage::{get_connection, DbPool};
use rusqlite::Connection;

/// A post stored by one fetch run.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_id: String,
    pub link: String,
    pub payload: PostPayload,
}

/// Store every feed item not already present, oldest of the batch first.
///
/// Skips are an exact-match existence check on the external post id — no
/// content re-validation, no update-in-place. A persistence error on one
/// item propagates; there is no per-item isolation or transaction boundary.
pub fn store_new_posts(conn: &Connection, items: &[FeedItem]) -> AppResult<Vec<NewPost>> {
    let mut stored = Vec::new();

    for item in items.iter().rev() {
        if db::post_exists(conn, &item.id)? {
            continue;
        }

        let payload = PostPayload::from_item(item);
        let link = item.permalink();
        db::insert_post(conn, &item.id, &link, &payload.to_json())?;

        stored.push(NewPost {
            post_id: item.id.clone(),
            link,
            payload,
        });
    }

    Ok(stored)
}

/// Keep only the newest `max_posts` items of a feed page. The feed arrives
/// reverse-chronological (newest first), so this is a plain truncate.
fn clamp_to_newest(items: &mut Vec<FeedItem>, max_posts: usize) {
    items.truncate(max_posts);
}

async fn fetch_feed(config: &InstagramConfig) -> AppResult<Vec<FeedItem>> {
    let client = InstagramClient::new()?;
    let session = client.login(&config.login, &config.password).await?;
    let user_id = session.user_id_for_name(&config.account).await?;
    let feed = session.user_feed(&user_id, None).await?;

    let mut items = feed.items;
    clamp_to_newest(&mut items, config.max_posts);
    Ok(items)
}

/// Run one fetch cycle for the configured account.
///
/// Authentication or feed-retrieval failure is logged and treated as
/// "nothing new" — the run returns an empty list rather than an error.
/// Persistence errors do propagate to the caller.
pub async fn run(config: &InstagramConfig, pool: &DbPool) -> AppResult<Vec<NewPost>> {
    let items = match fetch_feed(config).await {
        Ok(items) => items,
        Err(e) => {
            log::error!(
                "Instagram fetch failed for @{}: {} (code {})",
                config.account,
                e,
                e.code()
            );
            return Ok(Vec::new());
        }
    };

    let conn = get_connection(pool)?;
    let stored = store_new_posts(&conn, &items)?;

    log::info!("{}", run_summary(&stored));
    Ok(stored)
}

/// One aggregated line per run: timestamp plus each newly stored post's
/// permalink, in insertion (chronological) order.
fn run_summary(stored: &[NewPost]) -> String {
    let mut message = format!(
        "{} Get instagram posts: ",
        chrono::Local::now().format("%a, %b %e, %Y %H:%M")
    );
    for post in stored {
        message.push_str(&post.link);
        message.push(' ');
    }
    message
}
