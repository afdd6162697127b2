//! PULSE Server Library
//!
//! Multi-user music streaming server: accounts and sessions, private uploads,
//! an admin-curated global library, playlists, favorites and play history.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, media_store::MediaStore};
pub use state::AppState;
