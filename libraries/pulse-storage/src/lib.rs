//! PULSE Storage
//!
//! Multi-user `SQLite` database layer for PULSE.
//!
//! This crate provides persistent storage for users, sessions, songs,
//! playlists, favorites and play history.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **Ownership in queries**: slices that mutate per-user data take the
//!   caller's id and enforce ownership before writing
//! - **Cascades**: deleting a user removes every row it owns through
//!   `ON DELETE CASCADE` foreign keys
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://pulse.db").await?;
//! run_migrations(&pool).await?;
//!
//! // Songs visible to user 1, favorites flagged
//! let songs = pulse_storage::songs::list_visible(&pool, 1).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod favorites;
pub mod history;
pub mod playlists;
pub mod sessions;
pub mod songs;
pub mod stats;
pub mod users;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://pulse.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    // Foreign keys are on by default in sqlx; cascades depend on it
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Returns true when the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
