//! Play history: one row per successful playback, never deduplicated

use pulse_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Append a play
pub async fn record(pool: &SqlitePool, user_id: UserId, song_id: SongId) -> Result<i64> {
    let result = sqlx::query("INSERT INTO history (user_id, song_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent plays of a user first, joined with song metadata
pub async fn recent(pool: &SqlitePool, user_id: UserId, limit: i64) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT h.id, h.song_id, h.played_at,
               s.filename, s.title, s.artist, s.album, s.duration
        FROM history h
        INNER JOIN songs s ON s.id = h.song_id
        WHERE h.user_id = ?
        ORDER BY h.played_at DESC, h.id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| HistoryEntry {
            id: row.get("id"),
            song_id: row.get("song_id"),
            filename: row.get("filename"),
            title: row.get("title"),
            artist: row.get("artist"),
            album: row.get("album"),
            duration: row.get("duration"),
            played_at: row.get("played_at"),
        })
        .collect())
}
