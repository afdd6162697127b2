/// Audio playback API
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use pulse_core::AudioFormat;
use std::io::SeekFrom;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;

/// GET /api/play/:filename
/// Stream a visible song with range request support, recording the play
pub async fn play(
    Path(filename): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<Response> {
    let song = pulse_storage::songs::get_by_filename(&app_state.pool, &filename)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    if !song.is_visible_to(auth.user_id()) {
        return Err(ServerError::Forbidden(
            "Song is not visible to this user".to_string(),
        ));
    }

    let file_path = app_state.media.path_for(&song)?;

    let file_size = match tokio::fs::metadata(&file_path).await {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Song {} has no file at {}", song.id, file_path.display());
            return Err(ServerError::NotFound("Audio file not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    pulse_storage::history::record(&app_state.pool, auth.user_id(), song.id).await?;

    let mime_type = AudioFormat::from_filename(&song.filename)
        .map_or("application/octet-stream", |format| format.mime_type());

    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .and_then(|r| parse_range(r, file_size));

    let mut file = File::open(&file_path).await?;

    if let Some((start, end)) = range {
        let content_length = end - start + 1;
        file.seek(SeekFrom::Start(start)).await?;
        let body = Body::from_stream(ReaderStream::new(file.take(content_length)));

        return Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_LENGTH, content_length)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, end, file_size),
            )
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body)
            .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)));
    }

    // No usable range - stream entire file
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// Parse HTTP Range header
/// Formats: "bytes=start-end", "bytes=start-", "bytes=-suffix"
///
/// An end past the file is clamped; unsatisfiable ranges yield `None`.
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let range = range.strip_prefix("bytes=")?.trim();
    let (start_str, end_str) = range.split_once('-')?;

    if file_size == 0 {
        return None;
    }
    let last = file_size - 1;

    if start_str.is_empty() {
        let suffix: u64 = end_str.parse().ok()?;
        if suffix == 0 {
            return None;
        }
        return Some((file_size.saturating_sub(suffix), last));
    }

    let start: u64 = start_str.parse().ok()?;
    let end: u64 = if end_str.is_empty() {
        last
    } else {
        end_str.parse::<u64>().ok()?.min(last)
    };

    if start <= end {
        Some((start, end))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("bytes=0-999", 10000), Some((0, 999)));
        assert_eq!(parse_range("bytes=1000-", 10000), Some((1000, 9999)));
        assert_eq!(parse_range("bytes=0-9999", 10000), Some((0, 9999)));
        assert_eq!(parse_range("bytes=10000-", 10000), None); // Out of bounds
        assert_eq!(parse_range("invalid", 10000), None);
    }

    #[test]
    fn test_parse_suffix_and_clamped_ranges() {
        assert_eq!(parse_range("bytes=-500", 10000), Some((9500, 9999)));
        assert_eq!(parse_range("bytes=-20000", 10000), Some((0, 9999)));
        assert_eq!(parse_range("bytes=9000-20000", 10000), Some((9000, 9999)));
        assert_eq!(parse_range("bytes=-0", 10000), None);
        assert_eq!(parse_range("bytes=0-0", 0), None);
    }
}
