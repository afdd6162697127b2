//! PULSE Metadata
//!
//! Best-effort metadata extraction for uploaded audio files.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, M4A, AAC) via lofty
//! - A fallback policy that never fails: filename stem as title, a
//!   placeholder artist, zero duration
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_metadata::{extract_or_default, LoftyMetadataReader};
//! use std::path::Path;
//!
//! let reader = LoftyMetadataReader::new();
//! let metadata = extract_or_default(&reader, Path::new("/music/song.mp3"), "song");
//! println!("{} - {} ({}s)", metadata.artist, metadata.title, metadata.duration);
//! ```

mod error;
mod extract;
mod reader;

pub use error::{MetadataError, Result};
pub use extract::{extract_or_default, SongMetadata};
pub use reader::LoftyMetadataReader;
