//! Database operations for mirrored Instagram posts.
//!
//! `post_id` is the external id assigned by Instagram and the natural key
//! for deduplication: a post already present by that id is never
//! re-inserted or updated by the fetch workflow.

use crate::core::error::AppResult;
use crate::instagram::feed::PostPayload;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// A mirrored post row from the database.
#[derive(Debug, Clone)]
pub struct InstagramPost {
    pub id: i64,
    pub post_id: String,
    pub link: String,
    pub payload: Value,
    pub created_at: String,
}

fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InstagramPost> {
    let payload_str: String = row.get(3)?;
    Ok(InstagramPost {
        id: row.get(0)?,
        post_id: row.get(1)?,
        link: row.get(2)?,
        payload: serde_json::from_str(&payload_str).unwrap_or(Value::Null),
        created_at: row.get(4)?,
    })
}

impl InstagramPost {
    /// Structured view of the stored payload.
    pub fn payload(&self) -> Option<PostPayload> {
        PostPayload::from_json(&self.payload)
    }
}

/// Check whether a post with this external id is already stored.
pub fn post_exists(conn: &Connection, post_id: &str) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM instagram_posts WHERE post_id = ?1",
        params![post_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Insert a new post row. Returns the row id.
pub fn insert_post(conn: &Connection, post_id: &str, link: &str, payload: &Value) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO instagram_posts (post_id, link, payload, updated_at)
         VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
        params![post_id, link, payload.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a post by its external id.
pub fn get_post(conn: &Connection, post_id: &str) -> AppResult<Option<InstagramPost>> {
    let post = conn
        .query_row(
            "SELECT id, post_id, link, payload, created_at
             FROM instagram_posts WHERE post_id = ?1",
            params![post_id],
            parse_row,
        )
        .optional()?;
    Ok(post)
}

/// List stored posts, newest first (the order the website renders them in).
pub fn list_posts(conn: &Connection, limit: usize) -> AppResult<Vec<InstagramPost>> {
    let mut stmt = conn.prepare(
        "SELECT id, post_id, link, payload, created_at
         FROM instagram_posts
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit as i64], parse_row)?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row?);
    }
    Ok(posts)
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

    #[test]
    fn insert_then_exists() {
        let conn = make_conn();
        assert!(!post_exists(&conn, "123_7").unwrap());

        insert_post(
            &conn,
            "123_7",
            "https://www.instagram.com/p/AbC/",
            &json!({"media": [], "caption": "", "posted_at": 0}),
        )
        .unwrap();

        assert!(post_exists(&conn, "123_7").unwrap());
    }

    #[test]
    fn duplicate_external_id_is_rejected_by_schema() {
        let conn = make_conn();
        let payload = json!({"media": [], "caption": "", "posted_at": 0});
        insert_post(&conn, "dup_1", "https://www.instagram.com/p/a/", &payload).unwrap();

        let second = insert_post(&conn, "dup_1", "https://www.instagram.com/p/a/", &payload);
        assert!(second.is_err(), "post_id UNIQUE constraint must reject the duplicate");
    }

    #[test]
    fn get_post_roundtrips_payload() {
        let conn = make_conn();
        let payload = json!({
            "media": [{"url": "https://cdn.example/a.jpg", "isImage": true, "isVideo": false}],
            "caption": "hi",
            "posted_at": 1700000000i64,
        });
        insert_post(&conn, "9_9", "https://www.instagram.com/p/x/", &payload).unwrap();

        let post = get_post(&conn, "9_9").unwrap().expect("must exist");
        assert_eq!(post.post_id, "9_9");
        assert_eq!(post.link, "https://www.instagram.com/p/x/");
        assert_eq!(post.payload, payload);

        let parsed = post.payload().expect("payload must parse");
        assert_eq!(parsed.caption, "hi");
        assert_eq!(parsed.media.len(), 1);
    }

    #[test]
    fn get_post_nonexistent_returns_none() {
        let conn = make_conn();
        assert!(get_post(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn list_posts_newest_first() {
        let conn = make_conn();
        let payload = json!({"media": [], "caption": "", "posted_at": 0});
        insert_post(&conn, "a", "https://www.instagram.com/p/a/", &payload).unwrap();
        insert_post(&conn, "b", "https://www.instagram.com/p/b/", &payload).unwrap();
        insert_post(&conn, "c", "https://www.instagram.com/p/c/", &payload).unwrap();

        let posts = list_posts(&conn, 2).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].post_id, "c");
        assert_eq!(posts[1].post_id, "b");
    }
}
