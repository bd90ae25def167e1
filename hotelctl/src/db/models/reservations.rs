//! Database models for reservations and their line items.

use crate::api::models::reservations::ReservationStatus;
use crate::types::{ClientId, LineItemId, ReservationId, RoomId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database request for creating a reservation row.
///
/// The row is created with status `planned` and total 0; line items and the
/// final total are written by the booking flow inside the same transaction.
#[derive(Debug, Clone)]
pub struct ReservationCreateDBRequest {
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Database request for updating a reservation's dates.
#[derive(Debug, Clone, Default)]
pub struct ReservationUpdateDBRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Database response for a reservation
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDBResponse {
    pub id: ReservationId,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database response for a reservation line item
#[derive(Debug, Clone, FromRow)]
pub struct LineItemDBResponse {
    pub id: LineItemId,
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}
