/// Playlist API routes
use crate::{api::ApiJson, error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use pulse_core::{CreatePlaylist, Playlist, PlaylistId, PlaylistSong, SongId};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists =
        pulse_storage::playlists::get_user_playlists(&app_state.pool, auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<CreatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = pulse_storage::playlists::create(
        &app_state.pool,
        CreatePlaylist {
            name: req.name,
            description: req.description,
            user_id: auth.user_id(),
        },
    )
    .await?;

    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    pulse_storage::playlists::delete(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/playlists/:id/songs
pub async fn list_playlist_songs(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistSong>>> {
    let songs = pulse_storage::playlists::get_songs(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(songs))
}

/// POST /api/playlists/:id/songs/:song_id
/// Appends the song; adding an existing member is a no-op
pub async fn add_song(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    let added =
        pulse_storage::playlists::add_song(&app_state.pool, id, song_id, auth.user_id()).await?;
    Ok(Json(json!({ "success": true, "added": added })))
}

/// DELETE /api/playlists/:id/songs/:song_id
pub async fn remove_song(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    let removed =
        pulse_storage::playlists::remove_song(&app_state.pool, id, song_id, auth.user_id())
            .await?;
    Ok(Json(json!({ "success": true, "removed": removed })))
}
