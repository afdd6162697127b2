//! Admin statistics over songs, users and history

use pulse_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Song, user and play counts plus the most played title
pub async fn global(pool: &SqlitePool) -> Result<GlobalStats> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM songs) AS total_songs,
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM history) AS total_plays
        "#,
    )
    .fetch_one(pool)
    .await?;

    let top_song = top_played(pool, 1)
        .await?
        .into_iter()
        .next()
        .map(|song| song.title);

    Ok(GlobalStats {
        total_songs: row.get("total_songs"),
        total_users: row.get("total_users"),
        total_plays: row.get("total_plays"),
        top_song,
    })
}

/// Songs ranked by descending play count; unplayed songs are omitted
pub async fn top_played(pool: &SqlitePool, limit: i64) -> Result<Vec<TopSong>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.title, s.artist, COUNT(h.id) AS plays
        FROM songs s
        INNER JOIN history h ON h.song_id = s.id
        GROUP BY s.id
        ORDER BY plays DESC, s.id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TopSong {
            id: row.get("id"),
            title: row.get("title"),
            artist: row.get("artist"),
            plays: row.get("plays"),
        })
        .collect())
}
