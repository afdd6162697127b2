//! Row identifiers
//!
//! Every table uses an `INTEGER PRIMARY KEY`, so ids are plain `i64` aliases.

/// User identifier
pub type UserId = i64;

/// Song identifier
pub type SongId = i64;

/// Playlist identifier
pub type PlaylistId = i64;
