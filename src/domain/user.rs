//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check whether this user's username matches, ignoring case
    pub fn has_username(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }

    /// Check whether this user's email matches, ignoring case
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// User creation data carried into the service layer
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// User response (API projection)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Login name, unique ignoring case
    #[schema(example = "john_doe")]
    pub username: String,
    /// Email address, unique ignoring case
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    /// Display name
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}
