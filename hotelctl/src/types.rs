//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`UserId`]: Staff account identifier
//! - [`ClientId`]: Guest identifier
//! - [`RoomTypeId`]: Room category identifier
//! - [`RoomId`]: Room identifier
//! - [`ReservationId`]: Reservation identifier
//! - [`LineItemId`]: Reservation line item identifier
//! - [`PaymentId`]: Payment identifier
//! - [`ServiceId`]: Hotel service identifier

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type ClientId = Uuid;
pub type RoomTypeId = Uuid;
pub type RoomId = Uuid;
pub type ReservationId = Uuid;
pub type LineItemId = Uuid;
pub type PaymentId = Uuid;
pub type ServiceId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
