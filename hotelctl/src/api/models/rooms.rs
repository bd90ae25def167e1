//! Room API types.

use crate::db::models::rooms::RoomDBResponse;
use crate::types::{RoomId, RoomTypeId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Operational state of a room. `inactive` rooms are hidden from
/// availability and cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoomCreate {
    pub number: String,
    #[schema(value_type = String, format = "uuid")]
    pub room_type_id: RoomTypeId,
    /// Nightly rate
    pub price: Decimal,
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RoomUpdate {
    pub number: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub room_type_id: Option<RoomTypeId>,
    pub price: Option<Decimal>,
    pub status: Option<RoomStatus>,
}

/// Date range for the availability query. Both bounds are inclusive.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RoomId,
    pub number: String,
    #[schema(value_type = String, format = "uuid")]
    pub room_type_id: RoomTypeId,
    pub price: Decimal,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomDBResponse> for RoomResponse {
    fn from(room: RoomDBResponse) -> Self {
        Self {
            id: room.id,
            number: room.number,
            room_type_id: room.room_type_id,
            price: room.price,
            status: room.status,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}
