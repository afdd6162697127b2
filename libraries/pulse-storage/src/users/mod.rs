//! User accounts and credential lookup

use pulse_core::{error::Result, types::*, PulseError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, is_admin, created_at";

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at: row.get("created_at"),
    }
}

/// Create a user
///
/// Email is stored lower-cased. Returns `Duplicate` when the username or
/// email is already registered.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let email = user.email.trim().to_lowercase();
    let username = user.username.trim().to_string();

    let taken = sqlx::query(
        "SELECT
            EXISTS(SELECT 1 FROM users WHERE email = ?) AS email_taken,
            EXISTS(SELECT 1 FROM users WHERE username = ?) AS username_taken",
    )
    .bind(&email)
    .bind(&username)
    .fetch_one(pool)
    .await?;

    if taken.get::<i64, _>("email_taken") != 0 {
        return Err(PulseError::duplicate("Email already registered"));
    }
    if taken.get::<i64, _>("username_taken") != 0 {
        return Err(PulseError::duplicate("Username already taken"));
    }

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(&username)
    .bind(&email)
    .bind(&user.password_hash)
    .bind(user.is_admin)
    .execute(pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration
        if crate::is_unique_violation(&e) {
            PulseError::duplicate("Username or email already registered")
        } else {
            PulseError::from(e)
        }
    })?;

    get_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| PulseError::storage("Failed to retrieve created user"))
}

/// Get a user by id
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Look up a user and their password hash by (case-insensitive) email
pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<(User, String)>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| {
        let hash: String = row.get("password_hash");
        (user_from_row(&row), hash)
    }))
}

/// Get all users with their private song counts, oldest account first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<UserSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT u.id, u.username, u.email, u.is_admin, u.created_at,
               (SELECT COUNT(*) FROM songs s WHERE s.user_id = u.id AND s.is_global = 0) AS song_count
        FROM users u
        ORDER BY u.created_at, u.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| UserSummary {
            user: user_from_row(row),
            song_count: row.get("song_count"),
        })
        .collect())
}

/// Delete a user; owned rows go with it through cascades
///
/// Returns false when no such user exists.
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
