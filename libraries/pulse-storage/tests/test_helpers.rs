//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so migrations, constraints and cascades behave as in production.

#![allow(dead_code)]

use pulse_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = pulse_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        pulse_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a regular user
pub async fn create_test_user(pool: &SqlitePool, username: &str) -> UserId {
    create_user_with_role(pool, username, false).await
}

/// Test fixture: Create an admin user
pub async fn create_test_admin(pool: &SqlitePool, username: &str) -> UserId {
    create_user_with_role(pool, username, true).await
}

async fn create_user_with_role(pool: &SqlitePool, username: &str, is_admin: bool) -> UserId {
    pulse_storage::users::create(
        pool,
        CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            is_admin,
        },
    )
    .await
    .expect("Failed to create test user")
    .id
}

/// Test fixture: Create a song in the given scope
pub async fn create_test_song(
    pool: &SqlitePool,
    owner: UserId,
    title: &str,
    scope: SongScope,
) -> Song {
    let filename = format!(
        "{}_{}.mp3",
        title.to_lowercase().replace(' ', "_"),
        owner
    );

    pulse_storage::songs::create(
        pool,
        CreateSong {
            user_id: owner,
            filename,
            title: title.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: None,
            duration: 0.0,
            scope,
        },
    )
    .await
    .expect("Failed to create test song")
}

/// Test fixture: Create an empty playlist
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, owner: UserId) -> PlaylistId {
    pulse_storage::playlists::create(
        pool,
        CreatePlaylist {
            name: name.to_string(),
            description: None,
            user_id: owner,
        },
    )
    .await
    .expect("Failed to create test playlist")
    .id
}
