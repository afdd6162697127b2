/// Songs API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use pulse_core::{Song, SongId};

/// GET /api/songs
/// Global songs first, then the caller's uploads, with favorite flags
pub async fn list_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    let songs = pulse_storage::songs::list_visible(&app_state.pool, auth.user_id()).await?;
    Ok(Json(songs))
}

/// DELETE /api/songs/:id
/// Private songs may be deleted by their owner, global songs by admins
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let song = pulse_storage::songs::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    let allowed = if song.is_global {
        auth.is_admin()
    } else {
        song.user_id == auth.user_id()
    };
    if !allowed {
        return Err(ServerError::Forbidden(
            "Not allowed to delete this song".to_string(),
        ));
    }

    remove_song(&app_state, &song).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Delete the row, then the backing file
///
/// A file that is already missing does not fail the operation.
pub(crate) async fn remove_song(app_state: &AppState, song: &Song) -> Result<()> {
    if !pulse_storage::songs::delete(&app_state.pool, song.id).await? {
        return Err(ServerError::NotFound("Song not found".to_string()));
    }

    app_state.media.remove_logged(song).await;
    tracing::info!("Deleted song {} ({})", song.id, song.filename);

    Ok(())
}
