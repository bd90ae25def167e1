//! Database models for staff users.

use crate::api::models::users::{Role, UserCreate, UserUpdate};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub auth_source: String,
    pub password_hash: Option<String>,
}

impl UserCreateDBRequest {
    /// Build a DB request from an API create, with the already-hashed password.
    pub fn from_api(api: UserCreate, password_hash: Option<String>) -> Self {
        Self {
            username: api.username,
            email: api.email,
            role: api.role.unwrap_or(Role::Staff),
            auth_source: "local".to_string(),
            password_hash,
        }
    }
}

/// Database request for updating a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserUpdateDBRequest {
    pub fn new(update: UserUpdate) -> Self {
        Self {
            email: update.email,
            role: update.role,
            active: update.active,
            password_hash: None, // Hashed separately by the handler
        }
    }
}

/// Database response for a user
#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub auth_source: String,
    pub active: bool,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
