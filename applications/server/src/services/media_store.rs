/// Media store - audio files on disk, split by song scope
use crate::error::{Result, ServerError};
use pulse_core::{AudioFormat, Song, SongScope};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stem used when an upload name sanitises to nothing
const FALLBACK_STEM: &str = "track";

#[derive(Debug, Clone)]
pub struct MediaStore {
    uploads_path: PathBuf,
    library_path: PathBuf,
}

impl MediaStore {
    pub fn new(uploads_path: PathBuf, library_path: PathBuf) -> Self {
        Self {
            uploads_path,
            library_path,
        }
    }

    /// Initialize storage directories
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.uploads_path).await?;
        fs::create_dir_all(&self.library_path).await?;
        Ok(())
    }

    /// Directory holding files of the given scope
    pub fn dir_for(&self, scope: SongScope) -> &Path {
        match scope {
            SongScope::Global => &self.library_path,
            SongScope::Private => &self.uploads_path,
        }
    }

    /// Path of a stored file; rejects names that would escape the directory
    pub fn resolve(&self, scope: SongScope, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        Ok(self.dir_for(scope).join(filename))
    }

    /// Path of a song's file
    pub fn path_for(&self, song: &Song) -> Result<PathBuf> {
        self.resolve(song.scope(), &song.filename)
    }

    /// Generate a storage filename unused in both directories
    ///
    /// Shape: `<sanitised stem>_<8 hex chars>.<canonical extension>`.
    pub async fn unique_filename(&self, original: &str, format: AudioFormat) -> Result<String> {
        let stem = sanitize_stem(original);

        loop {
            let token = uuid::Uuid::new_v4().simple().to_string();
            let candidate = format!("{}_{}.{}", stem, &token[..8], format.extension());

            let taken = fs::try_exists(self.uploads_path.join(&candidate)).await?
                || fs::try_exists(self.library_path.join(&candidate)).await?;
            if !taken {
                return Ok(candidate);
            }
        }
    }

    /// Write an uploaded file
    pub async fn save(&self, scope: SongScope, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(scope, filename)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn remove(&self, scope: SongScope, filename: &str) -> Result<()> {
        let path = self.resolve(scope, filename)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("File already removed: {}", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a song's file, logging instead of failing
    ///
    /// Used after the row is gone, when there is nothing left to roll back.
    pub async fn remove_logged(&self, song: &Song) {
        if let Err(e) = self.remove(song.scope(), &song.filename).await {
            tracing::warn!("Failed to remove file {}: {}", song.filename, e);
        }
    }
}

/// Final path component of a client-supplied name
pub fn base_name(original: &str) -> &str {
    original.rsplit(['/', '\\']).next().unwrap_or(original)
}

/// Client-supplied name without directories or extension
pub fn original_stem(original: &str) -> &str {
    let name = base_name(original);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Reduce an upload name to a filesystem-safe stem
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; whitespace becomes `_`;
/// leading dots are stripped.
pub fn sanitize_stem(original: &str) -> String {
    let stem: String = original_stem(original)
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let stem = stem.trim_start_matches('.').trim_matches('_');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
        return Err(ServerError::Forbidden(
            "Path traversal attempt detected".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_stem("My Song (live).mp3"), "My_Song_live");
        assert_eq!(sanitize_stem("track-01_final.v2.flac"), "track-01_final.v2");
    }

    #[test]
    fn sanitize_strips_directories_and_dots() {
        assert_eq!(sanitize_stem("../../etc/passwd.mp3"), "passwd");
        assert_eq!(sanitize_stem("C:\\music\\..hidden.mp3"), "hidden");
    }

    #[test]
    fn sanitize_falls_back_when_nothing_survives() {
        assert_eq!(sanitize_stem("ÄÖÜ.mp3"), FALLBACK_STEM);
        assert_eq!(sanitize_stem("???.mp3"), FALLBACK_STEM);
    }

    #[test]
    fn original_stem_drops_extension_only() {
        assert_eq!(original_stem("Song Name.mp3"), "Song Name");
        assert_eq!(original_stem("dir/noext"), "noext");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = MediaStore::new(PathBuf::from("/u"), PathBuf::from("/l"));
        assert!(store.resolve(SongScope::Private, "../x.mp3").is_err());
        assert!(store.resolve(SongScope::Private, "a/b.mp3").is_err());
        assert_eq!(
            store.resolve(SongScope::Global, "a_1234abcd.mp3").unwrap(),
            PathBuf::from("/l/a_1234abcd.mp3")
        );
    }
}
