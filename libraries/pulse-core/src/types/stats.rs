//! Admin statistics

use super::ids::SongId;
use serde::{Deserialize, Serialize};

/// Library-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_songs: i64,
    pub total_users: i64,
    pub total_plays: i64,
    /// Title of the most played song, if anything was played
    pub top_song: Option<String>,
}

/// Song ranked by play count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSong {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub plays: i64,
}
