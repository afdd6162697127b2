use pulse_core::{error::Result, types::*, PulseError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const PLAYLIST_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.name, p.description, p.created_at,
           (SELECT COUNT(*) FROM playlist_songs ps WHERE ps.playlist_id = p.id) AS song_count
    FROM playlists p
"#;

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        song_count: row.get("song_count"),
    }
}

/// Get playlists owned by a user, newest first
pub async fn get_user_playlists(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(&format!(
        "{PLAYLIST_SELECT} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Get playlist by ID (no permission check)
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!("{PLAYLIST_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(playlist_from_row))
}

/// Get a playlist the user owns
///
/// `NotFound` if it does not exist, `PermissionDenied` if someone else owns it.
pub async fn get_owned(pool: &SqlitePool, id: PlaylistId, user_id: UserId) -> Result<Playlist> {
    match get_by_id(pool, id).await? {
        Some(p) if p.user_id == user_id => Ok(p),
        Some(_) => Err(PulseError::permission_denied("Playlist belongs to another user")),
        None => Err(PulseError::not_found("Playlist", id)),
    }
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let name = playlist.name.trim();
    if name.is_empty() {
        return Err(PulseError::invalid_input("Playlist name is required"));
    }
    let description = playlist
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let result = sqlx::query("INSERT INTO playlists (user_id, name, description) VALUES (?, ?, ?)")
        .bind(playlist.user_id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;

    get_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| PulseError::storage("Failed to retrieve created playlist"))
}

/// Delete playlist (owner only); memberships cascade
pub async fn delete(pool: &SqlitePool, id: PlaylistId, user_id: UserId) -> Result<()> {
    get_owned(pool, id, user_id).await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Add song to playlist (owner only)
///
/// Appends at position = current member count. Adding a song that is already
/// a member changes nothing and returns false. The song must be visible to
/// the owner.
pub async fn add_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    user_id: UserId,
) -> Result<bool> {
    get_owned(pool, playlist_id, user_id).await?;

    let song = crate::songs::get_by_id(pool, song_id)
        .await?
        .ok_or_else(|| PulseError::not_found("Song", song_id))?;
    if !song.is_visible_to(user_id) {
        return Err(PulseError::permission_denied("Song is not visible to this user"));
    }

    // Single statement so the count and the insert see the same snapshot
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO playlist_songs (playlist_id, song_id, position)
        SELECT ?, ?, COUNT(*) FROM playlist_songs WHERE playlist_id = ?
        "#,
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(playlist_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove song from playlist (owner only); removing a non-member is a no-op
pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    user_id: UserId,
) -> Result<bool> {
    get_owned(pool, playlist_id, user_id).await?;

    let result = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Songs of a playlist in position order (owner only)
pub async fn get_songs(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Vec<PlaylistSong>> {
    get_owned(pool, playlist_id, user_id).await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {}, ps.position AS member_position, ps.added_at
        FROM playlist_songs ps
        INNER JOIN songs s ON s.id = ps.song_id
        WHERE ps.playlist_id = ?
        ORDER BY ps.position ASC, ps.added_at ASC, s.id ASC
        "#,
        crate::songs::song_columns_with_favorite()
    ))
    .bind(user_id)
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| PlaylistSong {
            song: crate::songs::song_from_row(row),
            position: row.get("member_position"),
            added_at: row.get("added_at"),
        })
        .collect())
}
