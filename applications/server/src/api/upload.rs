/// Upload API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::media_store::{base_name, original_stem},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use pulse_core::{AudioFormat, CreateSong, SongScope, UserId};
use pulse_metadata::SongMetadata;
use serde::Serialize;

/// Multipart field carrying audio files; may repeat
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub count: usize,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One file received in a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
}

/// POST /api/upload
/// Upload files into the caller's private collection
pub async fn upload(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let files = parse_multipart(&headers, body).await?;
    ingest(&app_state, auth.user_id(), SongScope::Private, files).await
}

/// Extract every `file` field from a multipart/form-data body
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<Vec<UploadedFile>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Expected multipart/form-data".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;

        files.push(UploadedFile { name, data });
    }

    Ok(files)
}

/// Store a batch of uploads in the given scope
///
/// Each file succeeds or fails on its own. The response is 200 when at least
/// one file was stored and 400 otherwise.
pub async fn ingest(
    app_state: &AppState,
    owner: UserId,
    scope: SongScope,
    files: Vec<UploadedFile>,
) -> Result<Response> {
    let mut count = 0;
    let mut errors = Vec::new();

    for file in files {
        match ingest_one(app_state, owner, scope, &file).await {
            Ok(()) => count += 1,
            Err(message) => errors.push(message),
        }
    }

    if count == 0 {
        let error = if errors.is_empty() {
            "No files provided"
        } else {
            "No files were uploaded"
        };
        let body = UploadResponse {
            success: false,
            count,
            errors,
            error: Some(error.to_string()),
        };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    tracing::info!(
        "Stored {} {:?} upload(s) for user {} ({} rejected)",
        count,
        scope,
        owner,
        errors.len()
    );

    Ok(Json(UploadResponse {
        success: true,
        count,
        errors,
        error: None,
    })
    .into_response())
}

/// Save one file and record its song row; returns a per-file error message
async fn ingest_one(
    app_state: &AppState,
    owner: UserId,
    scope: SongScope,
    file: &UploadedFile,
) -> std::result::Result<(), String> {
    let display_name = match base_name(&file.name) {
        "" => "<unnamed>",
        name => name,
    };

    let format = AudioFormat::from_filename(display_name)
        .ok_or_else(|| format!("{display_name}: unsupported format"))?;

    let failed = |stage: &str, e: &dyn std::fmt::Display| {
        tracing::warn!("Upload of {} failed to {}: {}", display_name, stage, e);
        format!("{display_name}: failed to {stage}")
    };

    let filename = app_state
        .media
        .unique_filename(display_name, format)
        .await
        .map_err(|e| failed("save file", &e))?;
    let path = app_state
        .media
        .save(scope, &filename, &file.data)
        .await
        .map_err(|e| failed("save file", &e))?;

    let reader = app_state.metadata.clone();
    let fallback_title = original_stem(display_name).to_string();
    let title = fallback_title.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        pulse_metadata::extract_or_default(reader.as_ref(), &path, &title)
    })
    .await;

    // A panicking tag reader degrades to fallbacks like any other read failure
    let metadata = extracted.unwrap_or_else(|e| {
        tracing::warn!("Metadata extraction aborted for {}: {}", display_name, e);
        SongMetadata::fallback(&fallback_title)
    });

    let created = pulse_storage::songs::create(
        &app_state.pool,
        CreateSong {
            user_id: owner,
            filename: filename.clone(),
            title: metadata.title,
            artist: metadata.artist,
            album: metadata.album,
            duration: metadata.duration,
            scope,
        },
    )
    .await;

    if let Err(e) = created {
        discard(app_state, scope, &filename).await;
        return Err(failed("store song", &e));
    }

    Ok(())
}

async fn discard(app_state: &AppState, scope: SongScope, filename: &str) {
    if let Err(e) = app_state.media.remove(scope, filename).await {
        tracing::warn!("Failed to discard {}: {}", filename, e);
    }
}
