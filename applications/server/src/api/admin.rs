/// Admin API routes
///
/// Every handler checks the admin role before touching the resource, so a
/// regular user gets 403 whether or not the target exists.
use crate::{
    api::{songs::remove_song, upload, ApiJson},
    error::{Result, ServerError},
    middleware::{require_admin, AuthenticatedUser},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use bytes::Bytes;
use pulse_core::{GlobalStats, Song, SongId, SongScope, TopSong, UserId, UserSummary};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_TOP_LIMIT: i64 = 10;
const MAX_TOP_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    #[serde(default)]
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<SongId>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub success: bool,
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/admin/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    require_admin(&auth)?;

    let songs = pulse_storage::songs::list_global(&app_state.pool).await?;
    Ok(Json(songs))
}

/// POST /api/admin/songs
/// Upload files into the global library
pub async fn upload_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    require_admin(&auth)?;

    let files = upload::parse_multipart(&headers, body).await?;
    upload::ingest(&app_state, auth.user_id(), SongScope::Global, files).await
}

/// DELETE /api/admin/songs/:id
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    require_admin(&auth)?;

    let song = pulse_storage::songs::get_by_id(&app_state.pool, id)
        .await?
        .filter(|song| song.is_global)
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    remove_song(&app_state, &song).await?;

    Ok(Json(json!({ "success": true })))
}

/// PATCH /api/admin/songs/:id
pub async fn update_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<UpdateSongRequest>,
) -> Result<Json<Song>> {
    require_admin(&auth)?;

    let song = pulse_storage::songs::update_global_metadata(
        &app_state.pool,
        id,
        &req.title,
        req.artist.as_deref(),
        req.album.as_deref(),
    )
    .await?;

    tracing::info!("Admin {} edited song {}", auth.user_id(), id);

    Ok(Json(song))
}

/// POST /api/admin/songs/reorder
pub async fn reorder_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    require_admin(&auth)?;

    let updated = pulse_storage::songs::reorder_global(&app_state.pool, &req.order).await?;

    Ok(Json(ReorderResponse {
        success: true,
        updated,
    }))
}

/// GET /api/admin/stats
pub async fn stats(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<GlobalStats>> {
    require_admin(&auth)?;

    let stats = pulse_storage::stats::global(&app_state.pool).await?;
    Ok(Json(stats))
}

/// GET /api/admin/stats/top
pub async fn top_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopSong>>> {
    require_admin(&auth)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_LIMIT)
        .clamp(1, MAX_TOP_LIMIT);
    let songs = pulse_storage::stats::top_played(&app_state.pool, limit).await?;
    Ok(Json(songs))
}

/// GET /api/admin/users
pub async fn list_users(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<UserSummary>>> {
    require_admin(&auth)?;

    let users = pulse_storage::users::get_all(&app_state.pool).await?;
    Ok(Json(users))
}

/// DELETE /api/admin/users/:id
/// Removes a regular user, their rows (by cascade) and their uploaded files
pub async fn delete_user(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    require_admin(&auth)?;

    if id == auth.user_id() {
        return Err(ServerError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let user = pulse_storage::users::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    if user.is_admin {
        return Err(ServerError::Forbidden(
            "Cannot delete an admin account".to_string(),
        ));
    }

    // Collect files before the cascade removes the rows
    let songs = pulse_storage::songs::list_private_by_owner(&app_state.pool, id).await?;

    if !pulse_storage::users::delete(&app_state.pool, id).await? {
        return Err(ServerError::NotFound("User not found".to_string()));
    }

    for song in &songs {
        app_state.media.remove_logged(song).await;
    }

    tracing::info!(
        "Admin {} deleted user {} ({}) and {} file(s)",
        auth.user_id(),
        user.username,
        id,
        songs.len()
    );

    Ok(Json(json!({ "success": true, "removed_songs": songs.len() })))
}
