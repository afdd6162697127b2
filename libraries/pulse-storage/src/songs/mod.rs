//! Songs: per-user uploads and the admin-curated global library

use pulse_core::{error::Result, types::*, PulseError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const SONG_COLUMNS: &str = "s.id, s.user_id, s.filename, s.title, s.artist, s.album, \
     s.duration, s.is_global, s.position, s.uploaded_at";

/// Map a row selected with the song columns (and optionally `is_favorite`)
pub(crate) fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        user_id: row.get("user_id"),
        filename: row.get("filename"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration: row.get("duration"),
        is_global: row.get::<i64, _>("is_global") != 0,
        position: row.get("position"),
        uploaded_at: row.get("uploaded_at"),
        is_favorite: row
            .try_get::<i64, _>("is_favorite")
            .map(|flag| flag != 0)
            .unwrap_or(false),
    }
}

/// Columns plus the viewer's favorite flag; binds the viewer id once
pub(crate) fn song_columns_with_favorite() -> String {
    format!(
        "{SONG_COLUMNS}, EXISTS(SELECT 1 FROM favorites f \
         WHERE f.song_id = s.id AND f.user_id = ?) AS is_favorite"
    )
}

/// Insert a song row
///
/// Global songs are appended to the end of the library order; private songs
/// keep position 0.
pub async fn create(pool: &SqlitePool, song: CreateSong) -> Result<Song> {
    let mut tx = pool.begin().await?;

    let position: i64 = if song.scope.is_global() {
        sqlx::query("SELECT COALESCE(MAX(position) + 1, 0) AS next_pos FROM songs WHERE is_global = 1")
            .fetch_one(&mut *tx)
            .await?
            .get("next_pos")
    } else {
        0
    };

    let result = sqlx::query(
        r#"
        INSERT INTO songs (user_id, filename, title, artist, album, duration, is_global, position)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(song.user_id)
    .bind(&song.filename)
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.duration)
    .bind(song.scope.is_global())
    .bind(position)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if crate::is_unique_violation(&e) {
            PulseError::duplicate(format!("Filename already stored: {}", song.filename))
        } else {
            PulseError::from(e)
        }
    })?;

    tx.commit().await?;

    get_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| PulseError::storage("Failed to retrieve created song"))
}

/// Get a song by id
pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs s WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Get a song by its storage filename
pub async fn get_by_filename(pool: &SqlitePool, filename: &str) -> Result<Option<Song>> {
    let row = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs s WHERE s.filename = ?"
    ))
    .bind(filename)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Songs visible to a user: global songs first, then their own uploads
///
/// Within each group: stored position, then most recent upload first.
pub async fn list_visible(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM songs s
        WHERE s.is_global = 1 OR s.user_id = ?
        ORDER BY s.is_global DESC, s.position ASC, s.uploaded_at DESC, s.id DESC
        "#,
        song_columns_with_favorite()
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// The global library in curated order
pub async fn list_global(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {SONG_COLUMNS}
        FROM songs s
        WHERE s.is_global = 1
        ORDER BY s.position ASC, s.uploaded_at DESC, s.id DESC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Private songs owned by a user
pub async fn list_private_by_owner(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs s WHERE s.user_id = ? AND s.is_global = 0 ORDER BY s.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Delete a song row; memberships, favorites and history cascade
///
/// Returns false when no such song exists.
pub async fn delete(pool: &SqlitePool, id: SongId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Edit the display metadata of a global song
///
/// The edit replaces all three fields. Title must be non-empty after
/// trimming; a blank or missing artist resets to the placeholder and a blank
/// or missing album clears it. Private songs are reported as not found.
pub async fn update_global_metadata(
    pool: &SqlitePool,
    id: SongId,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
) -> Result<Song> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PulseError::invalid_input("Title is required"));
    }

    let artist = artist
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_ARTIST);
    let album = album.map(str::trim).filter(|a| !a.is_empty());

    let result = sqlx::query(
        "UPDATE songs SET title = ?, artist = ?, album = ? WHERE id = ? AND is_global = 1",
    )
    .bind(title)
    .bind(artist)
    .bind(album)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(PulseError::not_found("Song", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| PulseError::not_found("Song", id))
}

/// Assign `position = index` for each id, touching only global rows
///
/// Returns the number of rows updated. Runs in one transaction.
pub async fn reorder_global(pool: &SqlitePool, ordered_ids: &[SongId]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut updated = 0;

    for (index, id) in ordered_ids.iter().enumerate() {
        let result = sqlx::query("UPDATE songs SET position = ? WHERE id = ? AND is_global = 1")
            .bind(index as i64)
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        updated += result.rows_affected();
    }

    tx.commit().await?;

    Ok(updated)
}
