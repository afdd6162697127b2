//! PULSE Core
//!
//! Domain types, traits, and error handling shared by the PULSE crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Song`, `Playlist`, `HistoryEntry`, etc.
//! - **Core Traits**: `MetadataReader`
//! - **Error Handling**: Unified `PulseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use pulse_core::types::{AudioFormat, Identity, SongScope};
//!
//! let identity = Identity::new(1, "alice", false);
//! assert!(!identity.is_admin);
//!
//! assert_eq!(AudioFormat::from_filename("Track.MP3"), Some(AudioFormat::Mp3));
//! assert_eq!(SongScope::from_global_flag(true), SongScope::Global);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PulseError, Result};
pub use traits::MetadataReader;

pub use types::{
    AudioFormat, CreatePlaylist, CreateSong, CreateUser, FavoriteState, GlobalStats,
    HistoryEntry, Identity, Playlist, PlaylistId, PlaylistSong, Song, SongId, SongScope,
    SongTags, TopSong, User, UserId, UserSummary, UNKNOWN_ARTIST,
};
