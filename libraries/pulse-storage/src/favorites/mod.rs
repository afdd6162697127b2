//! Per-user favorite songs

use pulse_core::{error::Result, types::*, PulseError};
use sqlx::SqlitePool;

/// Mark or unmark a song as favorite; both directions are idempotent
///
/// Adding requires the song to exist and be visible to the user. Removing a
/// song that is not a favorite succeeds without change.
pub async fn set(
    pool: &SqlitePool,
    user_id: UserId,
    song_id: SongId,
    favorite: bool,
) -> Result<FavoriteState> {
    if favorite {
        let song = crate::songs::get_by_id(pool, song_id)
            .await?
            .ok_or_else(|| PulseError::not_found("Song", song_id))?;
        if !song.is_visible_to(user_id) {
            return Err(PulseError::permission_denied("Song is not visible to this user"));
        }

        sqlx::query("INSERT OR IGNORE INTO favorites (user_id, song_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(song_id)
            .execute(pool)
            .await?;
    } else {
        sqlx::query("DELETE FROM favorites WHERE user_id = ? AND song_id = ?")
            .bind(user_id)
            .bind(song_id)
            .execute(pool)
            .await?;
    }

    Ok(FavoriteState {
        song_id,
        is_favorite: favorite,
    })
}

/// Favorite songs still visible to the user, most recently added first
pub async fn list(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM favorites fav
        INNER JOIN songs s ON s.id = fav.song_id
        WHERE fav.user_id = ? AND (s.is_global = 1 OR s.user_id = fav.user_id)
        ORDER BY fav.added_at DESC, fav.rowid DESC
        "#,
        crate::songs::song_columns_with_favorite()
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(crate::songs::song_from_row).collect())
}
