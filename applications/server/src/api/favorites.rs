/// Favorites API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use pulse_core::{Song, SongId};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub success: bool,
    pub is_favorite: bool,
}

/// GET /api/favorites
pub async fn list_favorites(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    let songs = pulse_storage::favorites::list(&app_state.pool, auth.user_id()).await?;
    Ok(Json(songs))
}

/// POST /api/favorites/:id
pub async fn add_favorite(
    Path(song_id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FavoriteResponse>> {
    set_favorite(&app_state, &auth, song_id, true).await
}

/// DELETE /api/favorites/:id
pub async fn remove_favorite(
    Path(song_id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FavoriteResponse>> {
    set_favorite(&app_state, &auth, song_id, false).await
}

async fn set_favorite(
    app_state: &AppState,
    auth: &AuthenticatedUser,
    song_id: SongId,
    favorite: bool,
) -> Result<Json<FavoriteResponse>> {
    let state =
        pulse_storage::favorites::set(&app_state.pool, auth.user_id(), song_id, favorite).await?;

    Ok(Json(FavoriteResponse {
        success: true,
        is_favorite: state.is_favorite,
    }))
}
