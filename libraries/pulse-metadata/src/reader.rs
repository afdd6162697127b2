/// Metadata reader implementation using lofty
use crate::error::MetadataError;
use lofty::{Accessor, AudioFile, TaggedFileExt};
use pulse_core::{MetadataReader, SongTags};
use std::path::Path;

/// Metadata reader using the lofty library
#[derive(Debug, Clone, Copy)]
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    /// Extract title, artist and album from a lofty tag
    fn extract_from_tag(tag: &lofty::Tag) -> SongTags {
        let text = |value: Option<std::borrow::Cow<'_, str>>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        SongTags {
            title: text(tag.title()),
            artist: text(tag.artist()),
            album: text(tag.album()),
            duration_seconds: None,
        }
    }
}

impl Default for LoftyMetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader for LoftyMetadataReader {
    fn read(&self, path: &Path) -> pulse_core::Result<SongTags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()).into());
        }

        let tagged_file = lofty::read_from_path(path).map_err(MetadataError::from)?;

        let duration = tagged_file.properties().duration().as_secs_f64();

        // Primary tag first, then whichever tag the container has
        let mut tags = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .map(Self::extract_from_tag)
            .unwrap_or_default();
        tags.duration_seconds = Some(duration);

        Ok(tags)
    }
}
