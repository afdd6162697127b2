/// Shared application state
use crate::services::{AuthService, MediaStore};
use pulse_core::MetadataReader;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub media: Arc<MediaStore>,
    pub metadata: Arc<dyn MetadataReader>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        media: Arc<MediaStore>,
        metadata: Arc<dyn MetadataReader>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            media,
            metadata,
        }
    }
}
