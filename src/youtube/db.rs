//! Database operations for mirrored YouTube videos.
//!
//! Videos use a soft-delete marker (`deleted_at`): removed records stay in
//! storage but are excluded from the visible listing the website reads.

use crate::core::error::AppResult;
use crate::youtube::video::YoutubeVideo;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<YoutubeVideo> {
    let payload_str: Option<String> = row.get(5)?;
    Ok(YoutubeVideo {
        id: row.get(0)?,
        video_id: row.get(1)?,
        title: row.get(2)?,
        channel_id: row.get(3)?,
        published_at: row.get(4)?,
        payload: payload_str.and_then(|s| serde_json::from_str(&s).ok()),
        deleted_at: row.get(6)?,
    })
}

const SELECT_COLUMNS: &str = "id, video_id, title, channel_id, published_at, payload, deleted_at";

/// Insert a new video row. Returns the row id.
pub fn insert_video(
    conn: &Connection,
    video_id: &str,
    title: &str,
    channel_id: &str,
    published_at: &str,
    payload: Option<&Value>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO youtube_videos (video_id, title, channel_id, published_at, payload, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, CURRENT_TIMESTAMP)",
        params![video_id, title, channel_id, published_at, payload.map(|v| v.to_string())],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a video by its external id (soft-deleted rows included).
pub fn get_video(conn: &Connection, video_id: &str) -> AppResult<Option<YoutubeVideo>> {
    let video = conn
        .query_row(
            &format!("SELECT {} FROM youtube_videos WHERE video_id = ?1", SELECT_COLUMNS),
            params![video_id],
            parse_row,
        )
        .optional()?;
    Ok(video)
}

/// Persist the mutable fields of a video (title + payload).
pub fn save_video(conn: &Connection, video: &YoutubeVideo) -> AppResult<()> {
    conn.execute(
        "UPDATE youtube_videos
         SET title = ?1, payload = ?2, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?3",
        params![
            video.title,
            video.payload.as_ref().map(|v| v.to_string()),
            video.id
        ],
    )?;
    Ok(())
}

/// Mark a video as soft-deleted. Returns the timestamp written.
pub fn soft_delete_video(conn: &Connection, id: i64) -> AppResult<String> {
    let deleted_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    conn.execute(
        "UPDATE youtube_videos
         SET deleted_at = ?1, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?2",
        params![deleted_at, id],
    )?;
    Ok(deleted_at)
}

/// List videos that are not soft-deleted, newest first.
pub fn list_visible_videos(conn: &Connection, limit: usize) -> AppResult<Vec<YoutubeVideo>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM youtube_videos
         WHERE deleted_at IS NULL
         ORDER BY id DESC
         LIMIT ?1",
        SELECT_COLUMNS
    ))?;

    let rows = stmt.query_map(params![limit as i64], parse_row)?;

    let mut videos = Vec::new();
    for row in rows {
        videos.push(row?);
    }
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::run_migrations_for_test;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn make_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations_for_test(&mut conn).unwrap();
        conn
    }

    fn seed(conn: &Connection, video_id: &str, title: &str) -> i64 {
        insert_video(
            conn,
            video_id,
            title,
            "UC123",
            "2024-03-01 12:00:00",
            Some(&json!({"description": "d", "thumbnail": "https://i.ytimg.com/t.jpg"})),
        )
        .unwrap()
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let conn = make_conn();
        seed(&conn, "vid1", "First");

        let video = get_video(&conn, "vid1").unwrap().expect("must exist");
        assert_eq!(video.title, "First");
        assert_eq!(video.channel_id, "UC123");
        assert!(video.deleted_at.is_none());
        assert_eq!(video.payload.as_ref().unwrap()["description"], json!("d"));
    }

    #[test]
    fn duplicate_video_id_is_rejected_by_schema() {
        let conn = make_conn();
        seed(&conn, "vid1", "First");
        let second = insert_video(&conn, "vid1", "Again", "UC123", "2024-03-01 12:00:00", None);
        assert!(second.is_err(), "video_id UNIQUE constraint must reject the duplicate");
    }

    #[test]
    fn save_persists_title_and_payload() {
        let conn = make_conn();
        seed(&conn, "vid1", "First");

        let mut video = get_video(&conn, "vid1").unwrap().unwrap();
        video.title = "Renamed".to_string();
        video.payload = Some(json!({"description": "new", "thumbnail": "https://i.ytimg.com/t.jpg"}));
        save_video(&conn, &video).unwrap();

        let reloaded = get_video(&conn, "vid1").unwrap().unwrap();
        assert_eq!(reloaded.title, "Renamed");
        assert_eq!(reloaded.payload.unwrap()["description"], json!("new"));
    }

    #[test]
    fn soft_delete_excludes_from_visible_listing() {
        let conn = make_conn();
        let id1 = seed(&conn, "vid1", "First");
        seed(&conn, "vid2", "Second");

        soft_delete_video(&conn, id1).unwrap();

        let visible = list_visible_videos(&conn, 10).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].video_id, "vid2");

        // Row still exists, just marked
        let hidden = get_video(&conn, "vid1").unwrap().unwrap();
        assert!(hidden.deleted_at.is_some());
    }

    #[test]
    fn visible_listing_is_newest_first() {
        let conn = make_conn();
        seed(&conn, "vid1", "First");
        seed(&conn, "vid2", "Second");
        seed(&conn, "vid3", "Third");

        let visible = list_visible_videos(&conn, 2).unwrap();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].video_id, "vid3");
        assert_eq!(visible[1].video_id, "vid2");
    }
}
