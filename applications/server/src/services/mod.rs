/// Server services
pub mod auth;
pub mod media_store;

pub use auth::AuthService;
pub use media_store::MediaStore;
