//! Database models for rooms.

use crate::api::models::rooms::{RoomCreate, RoomStatus, RoomUpdate};
use crate::types::{RoomId, RoomTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database request for creating a room
#[derive(Debug, Clone)]
pub struct RoomCreateDBRequest {
    pub number: String,
    pub room_type_id: RoomTypeId,
    pub price: Decimal,
    pub status: RoomStatus,
}

impl From<RoomCreate> for RoomCreateDBRequest {
    fn from(api: RoomCreate) -> Self {
        Self {
            number: api.number,
            room_type_id: api.room_type_id,
            price: api.price,
            status: api.status.unwrap_or(RoomStatus::Available),
        }
    }
}

/// Database request for updating a room
#[derive(Debug, Clone, Default)]
pub struct RoomUpdateDBRequest {
    pub number: Option<String>,
    pub room_type_id: Option<RoomTypeId>,
    pub price: Option<Decimal>,
    pub status: Option<RoomStatus>,
}

impl From<RoomUpdate> for RoomUpdateDBRequest {
    fn from(api: RoomUpdate) -> Self {
        Self {
            number: api.number,
            room_type_id: api.room_type_id,
            price: api.price,
            status: api.status,
        }
    }
}

/// Database response for a room
#[derive(Debug, Clone, FromRow)]
pub struct RoomDBResponse {
    pub id: RoomId,
    pub number: String,
    pub room_type_id: RoomTypeId,
    pub price: Decimal,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
