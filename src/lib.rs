//! Feedmirror - mirrors a team's social-media presence into SQLite
//!
//! Two independent workflows share a database and nothing else:
//!
//! - `instagram`: fetch the configured account's recent posts through the
//!   private API, skip the ones already stored, insert the rest.
//! - `youtube`: re-pull metadata for stored videos, diff title/description,
//!   soft-delete records whose remote video disappeared.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `storage`: connection pool and schema migrations
//! - `instagram` / `youtube`: the two mirror workflows
//! - `scheduler`: background loops driving both

pub mod cli;
pub mod core;
pub mod instagram;
pub mod scheduler;
pub mod storage;
pub mod youtube;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult, InstagramConfig, YoutubeConfig};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
