/// User domain types
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// User account (credentials never leave the storage layer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Display name, unique
    pub username: String,

    /// Lower-cased login email, unique
    pub email: String,

    /// Whether the account may manage the global library and other users
    pub is_admin: bool,

    /// Account creation timestamp
    pub created_at: String,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// User row as listed in the admin panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,

    /// Number of private songs owned by the user
    pub song_count: i64,
}

/// Resolved caller identity for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl Identity {
    /// Create an identity
    pub fn new(user_id: UserId, username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_admin,
        }
    }
}
