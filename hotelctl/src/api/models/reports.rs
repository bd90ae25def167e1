//! Reporting API types.

use crate::api::models::reservations::ReservationStatus;
use crate::db::handlers::reports::{PopularRoomRow, RevenueRow, StatusCountRow};
use crate::types::RoomId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Date window for the revenue report. Both bounds inclusive.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RevenueQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountResponse {
    pub status: ReservationStatus,
    pub count: i64,
}

impl From<StatusCountRow> for StatusCountResponse {
    fn from(row: StatusCountRow) -> Self {
        Self {
            status: row.status,
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevenueResponse {
    pub day: NaiveDate,
    pub revenue: Decimal,
}

impl From<RevenueRow> for RevenueResponse {
    fn from(row: RevenueRow) -> Self {
        Self {
            day: row.day,
            revenue: row.revenue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PopularRoomResponse {
    #[schema(value_type = String, format = "uuid")]
    pub room_id: RoomId,
    pub number: String,
    pub bookings: i64,
}

impl From<PopularRoomRow> for PopularRoomResponse {
    fn from(row: PopularRoomRow) -> Self {
        Self {
            room_id: row.room_id,
            number: row.number,
            bookings: row.bookings,
        }
    }
}
