/// Song domain types
use super::ids::{SongId, UserId};
use serde::{Deserialize, Serialize};

/// Artist stored when tags carry none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Visibility partition of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongScope {
    /// Admin-curated library track, visible to everyone
    Global,
    /// Upload visible only to its owner
    Private,
}

impl SongScope {
    /// Map the stored `is_global` flag to a scope
    pub fn from_global_flag(is_global: bool) -> Self {
        if is_global {
            SongScope::Global
        } else {
            SongScope::Private
        }
    }

    pub fn is_global(self) -> bool {
        self == SongScope::Global
    }
}

/// Song row, optionally annotated with the caller's favorite flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    /// Uploader; for global songs this is the admin who added it
    pub user_id: UserId,
    /// Storage key inside the scope's media directory
    pub filename: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Seconds, 0 when unknown
    pub duration: f64,
    pub is_global: bool,
    pub position: i64,
    pub uploaded_at: String,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Song {
    pub fn scope(&self) -> SongScope {
        SongScope::from_global_flag(self.is_global)
    }

    /// A song is visible iff it is global or owned by the viewer
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.is_global || self.user_id == user_id
    }
}

/// Data for creating a new song row
#[derive(Debug, Clone)]
pub struct CreateSong {
    pub user_id: UserId,
    pub filename: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: f64,
    pub scope: SongScope,
}

/// Tags read from an audio file; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<f64>,
}

/// Result of a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteState {
    pub song_id: SongId,
    pub is_favorite: bool,
}
