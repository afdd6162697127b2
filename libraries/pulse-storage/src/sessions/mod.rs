//! Server-side login sessions

use pulse_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Record a new session for a user
pub async fn create(pool: &SqlitePool, session_id: &str, user_id: UserId) -> Result<()> {
    sqlx::query("INSERT INTO sessions (id, user_id) VALUES (?, ?)")
        .bind(session_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// SQLite `datetime` modifier for "`max_age_secs` ago"
fn age_modifier(max_age_secs: i64) -> String {
    format!("-{} seconds", max_age_secs.max(0))
}

/// Resolve a session to the current identity of its user
///
/// Returns `None` for unknown (logged out) sessions, sessions older than
/// `max_age_secs`, and sessions of users that were deleted since.
pub async fn resolve(
    pool: &SqlitePool,
    session_id: &str,
    max_age_secs: i64,
) -> Result<Option<Identity>> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.username, u.is_admin
        FROM sessions s
        INNER JOIN users u ON u.id = s.user_id
        WHERE s.id = ? AND s.created_at > datetime('now', ?)
        "#,
    )
    .bind(session_id)
    .bind(age_modifier(max_age_secs))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| {
        Identity::new(
            row.get("id"),
            row.get::<String, _>("username"),
            row.get::<i64, _>("is_admin") != 0,
        )
    }))
}

/// Delete a session; deleting an unknown session is a no-op
pub async fn delete(pool: &SqlitePool, session_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete every session older than `max_age_secs`; returns how many went
pub async fn delete_expired(pool: &SqlitePool, max_age_secs: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE created_at <= datetime('now', ?)")
        .bind(age_modifier(max_age_secs))
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
