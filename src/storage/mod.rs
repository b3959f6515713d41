//! SQLite storage: connection pool and schema migrations.

pub mod db;
pub mod migrations;

pub use db::{create_pool, get_connection, DbConnection, DbPool};
