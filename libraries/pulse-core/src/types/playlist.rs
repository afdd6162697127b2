//! Playlist domain types

use super::ids::{PlaylistId, UserId};
use super::song::Song;
use serde::{Deserialize, Serialize};

/// Playlist owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub song_count: i64,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
}

/// Song in a playlist with its membership data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSong {
    #[serde(flatten)]
    pub song: Song,
    /// Member count at insert time
    #[serde(rename = "playlist_position")]
    pub position: i64,
    pub added_at: String,
}
