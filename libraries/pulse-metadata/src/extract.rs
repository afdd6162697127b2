/// Never-failing extraction on top of a `MetadataReader`
use pulse_core::{MetadataReader, SongTags, UNKNOWN_ARTIST};
use std::path::Path;

/// Metadata ready to be stored on a song row
#[derive(Debug, Clone, PartialEq)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Seconds, 0 when unknown
    pub duration: f64,
}

impl SongMetadata {
    /// Metadata used when nothing could be read from the file
    pub fn fallback(title: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: None,
            duration: 0.0,
        }
    }

    /// Fill missing fields of `tags` with the fallback values
    fn from_tags(tags: SongTags, fallback_title: &str) -> Self {
        let duration = tags
            .duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);

        Self {
            title: tags.title.unwrap_or_else(|| fallback_title.to_string()),
            artist: tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album: tags.album,
            duration,
        }
    }
}

/// Read tags from `path`, degrading to fallbacks on any failure
///
/// Title falls back to `fallback_title` (the upload's filename stem), artist
/// to [`UNKNOWN_ARTIST`], duration to 0. Failures are logged, never returned.
pub fn extract_or_default(
    reader: &dyn MetadataReader,
    path: &Path,
    fallback_title: &str,
) -> SongMetadata {
    let tags = match reader.read(path) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("Metadata extraction failed for {}: {}", path.display(), e);
            SongTags::default()
        }
    };

    SongMetadata::from_tags(tags, fallback_title)
}
