/// Core traits for PULSE
use crate::error::Result;
use crate::types::SongTags;
use std::path::Path;

/// Metadata reader trait
///
/// Implementers extract tag metadata from audio files. Reading is fallible;
/// callers that must never fail wrap it with their own fallback policy.
pub trait MetadataReader: Send + Sync {
    /// Read metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its tags cannot be parsed
    fn read(&self, path: &Path) -> Result<SongTags>;
}
