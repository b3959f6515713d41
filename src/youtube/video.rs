//! The mirrored YouTube video record and its diff-and-update workflow.

use crate::core::error::AppResult;
use crate::storage::{get_connection, DbPool};
use crate::youtube::client::{VideoSnippet, YoutubeClient};
use crate::youtube::db;
use rusqlite::Connection;
use serde_json::{json, Value};

/// A video row from the database.
///
/// `title` and the payload's `description` mirror the remote source as of
/// the last successful update call. `deleted_at` is the soft-delete marker.
#[derive(Debug, Clone)]
pub struct YoutubeVideo {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub published_at: String,
    /// Structured extras: description, thumbnail, arbitrary fields
    pub payload: Option<Value>,
    pub deleted_at: Option<String>,
}

/// What applying a remote snapshot did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Remote video no longer exists
    Gone,
    /// Remote matches the stored fields
    Unchanged,
    Updated {
        title_changed: bool,
        description_changed: bool,
    },
}

impl YoutubeVideo {
    /// Watch-page link for the video.
    pub fn link(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    /// Description text stored in the payload; empty when absent.
    pub fn description(&self) -> String {
        self.payload
            .as_ref()
            .and_then(|p| p.get("description"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Store the description inside the payload, creating the payload
    /// object when the row predates it.
    pub fn set_description(&mut self, description: &str) {
        let payload = self.payload.get_or_insert_with(|| json!({}));
        if let Some(map) = payload.as_object_mut() {
            map.insert("description".to_string(), Value::String(description.to_string()));
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The render bundle the website consumes: one video media entry
    /// (embed url + thumbnail as first frame), permalink, caption, title.
    pub fn media_payload(&self) -> Value {
        let thumbnail = self
            .payload
            .as_ref()
            .and_then(|p| p.get("thumbnail"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        json!({
            "media": [{
                "first_frame": thumbnail,
                "url": format!("https://www.youtube.com/embed/{}", self.video_id),
                "isImage": false,
                "isVideo": true,
            }],
            "url": self.link(),
            "caption": self.description(),
            "title": self.title,
        })
    }

    /// Apply a remote metadata snapshot: update only the fields that
    /// differ. `None` means the remote video is gone.
    pub fn apply_remote(&mut self, remote: Option<&VideoSnippet>) -> RemoteOutcome {
        let snippet = match remote {
            Some(snippet) => snippet,
            None => return RemoteOutcome::Gone,
        };

        let title_changed = self.title != snippet.title;
        if title_changed {
            self.title = snippet.title.clone();
        }

        let description_changed = self.description() != snippet.description;
        if description_changed {
            self.set_description(&snippet.description);
        }

        if title_changed || description_changed {
            RemoteOutcome::Updated {
                title_changed,
                description_changed,
            }
        } else {
            RemoteOutcome::Unchanged
        }
    }

    /// Pull current remote metadata and persist the result.
    ///
    /// Returns true when the call and persist completed; any failure is
    /// logged (message + code) and yields false, never a propagated error.
    /// The connection is taken from the pool only after the remote call
    /// finishes, so no `Connection` borrow lives across an await and the
    /// future stays `Send` for the spawned scheduler loops.
    pub async fn update_from_youtube(&mut self, client: &YoutubeClient, pool: &DbPool) -> bool {
        let snippet = match client.video_snippet(&self.video_id).await {
            Ok(snippet) => snippet,
            Err(e) => {
                log::error!(
                    "update_from_youtube failed for {}: {} (code {})",
                    self.video_id,
                    e,
                    e.code()
                );
                return false;
            }
        };

        let conn = match get_connection(pool) {
            Ok(conn) => conn,
            Err(e) => {
                log::error!(
                    "update_from_youtube could not get a connection for {}: {}",
                    self.video_id,
                    e
                );
                return false;
            }
        };
        self.update_from_snippet(snippet.as_ref(), &conn)
    }

    /// Apply a fetched metadata snapshot and persist the outcome.
    ///
    /// When the remote video is gone the record is soft-deleted and no
    /// further save runs for it. Persistence failures are logged and yield
    /// false.
    pub fn update_from_snippet(&mut self, snippet: Option<&VideoSnippet>, conn: &Connection) -> bool {
        let persisted: AppResult<()> = match self.apply_remote(snippet) {
            RemoteOutcome::Gone => db::soft_delete_video(conn, self.id).map(|deleted_at| {
                log::info!("Video {} gone upstream, soft-deleting", self.video_id);
                self.deleted_at = Some(deleted_at);
            }),
            RemoteOutcome::Unchanged | RemoteOutcome::Updated { .. } => db::save_video(conn, self),
        };

        match persisted {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "update_from_snippet failed to persist {}: {} (code {})",
                    self.video_id,
                    e,
                    e.code()
                );
                false
            }
        }
    }
}
