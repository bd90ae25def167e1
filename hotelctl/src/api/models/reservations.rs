//! Reservation API types and the reservation state machine.

use crate::db::models::reservations::{LineItemDBResponse, ReservationDBResponse};
use crate::types::{ClientId, LineItemId, ReservationId, RoomId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Lifecycle state of a reservation.
///
/// ```text
/// planned -> occupied -> finished
/// planned -> cancelled
/// occupied -> cancelled
/// ```
///
/// `finished` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Planned,
    Occupied,
    Cancelled,
    Finished,
}

impl ReservationStatus {
    /// Whether moving from `self` to `target` is a legal transition.
    pub fn can_transition_to(self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            (Planned, Occupied) | (Planned, Cancelled) | (Occupied, Finished) | (Occupied, Cancelled)
        )
    }
}

/// Request to book a reservation: a client, a stay range and the rooms.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReservationCreate {
    #[schema(value_type = String, format = "uuid")]
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = Vec<String>)]
    pub room_ids: Vec<RoomId>,
}

/// Partial update to the stay dates.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReservationUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Replacement room set for a planned reservation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoomSetUpdate {
    #[schema(value_type = Vec<String>)]
    pub room_ids: Vec<RoomId>,
}

/// Optional filters for the reservation listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    pub status: Option<ReservationStatus>,
    #[param(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
}

/// A room held by a reservation with its price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineItemResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: LineItemId,
    #[schema(value_type = String, format = "uuid")]
    pub room_id: RoomId,
    /// Nightly rate captured when the room was attached
    pub price: Decimal,
}

impl From<LineItemDBResponse> for LineItemResponse {
    fn from(item: LineItemDBResponse) -> Self {
        Self {
            id: item.id,
            room_id: item.room_id,
            price: item.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ReservationId,
    #[schema(value_type = String, format = "uuid")]
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    /// Sum of the line-item price snapshots
    pub total: Decimal,
    pub rooms: Vec<LineItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationResponse {
    pub fn from_parts(reservation: ReservationDBResponse, items: Vec<LineItemDBResponse>) -> Self {
        Self {
            id: reservation.id,
            client_id: reservation.client_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            status: reservation.status,
            total: reservation.total,
            rooms: items.into_iter().map(LineItemResponse::from).collect(),
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

/// Minimal response returned by the booking endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    #[schema(value_type = String, format = "uuid")]
    pub reservation_id: ReservationId,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert!(Planned.can_transition_to(Occupied));
        assert!(Planned.can_transition_to(Cancelled));
        assert!(Occupied.can_transition_to(Finished));
        assert!(Occupied.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for target in [Planned, Occupied, Cancelled, Finished] {
            assert!(!Cancelled.can_transition_to(target));
            assert!(!Finished.can_transition_to(target));
        }
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!Planned.can_transition_to(Finished));
        assert!(!Planned.can_transition_to(Planned));
        assert!(!Occupied.can_transition_to(Planned));
        assert!(!Occupied.can_transition_to(Occupied));
    }
}
