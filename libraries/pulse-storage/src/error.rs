/// Storage-specific errors
use thiserror::Error;

/// Storage error types
///
/// Query-level failures surface as `pulse_core::PulseError`; this type covers
/// opening the database and migrating it.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for pulse_core::PulseError {
    fn from(err: StorageError) -> Self {
        pulse_core::PulseError::storage(err.to_string())
    }
}
