//! Room category API types.

use crate::db::models::room_types::RoomTypeDBResponse;
use crate::types::RoomTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoomTypeCreate {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RoomTypeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RoomTypeId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomTypeDBResponse> for RoomTypeResponse {
    fn from(room_type: RoomTypeDBResponse) -> Self {
        Self {
            id: room_type.id,
            name: room_type.name,
            description: room_type.description,
            capacity: room_type.capacity,
            active: room_type.active,
            created_at: room_type.created_at,
            updated_at: room_type.updated_at,
        }
    }
}
