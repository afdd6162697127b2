//! Play history types

use super::ids::SongId;
use serde::{Deserialize, Serialize};

/// One playback, joined with the song it played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub song_id: SongId,
    pub filename: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: f64,
    pub played_at: String,
}
