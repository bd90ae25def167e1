//! Database models for room categories.

use crate::api::models::room_types::{RoomTypeCreate, RoomTypeUpdate};
use crate::types::RoomTypeId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a room type
#[derive(Debug, Clone)]
pub struct RoomTypeCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}

impl From<RoomTypeCreate> for RoomTypeCreateDBRequest {
    fn from(api: RoomTypeCreate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            capacity: api.capacity,
        }
    }
}

/// Database request for updating a room type
#[derive(Debug, Clone, Default)]
pub struct RoomTypeUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub active: Option<bool>,
}

impl From<RoomTypeUpdate> for RoomTypeUpdateDBRequest {
    fn from(api: RoomTypeUpdate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            capacity: api.capacity,
            active: api.active,
        }
    }
}

/// Database response for a room type
#[derive(Debug, Clone, FromRow)]
pub struct RoomTypeDBResponse {
    pub id: RoomTypeId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
