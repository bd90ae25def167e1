//! API request and response types.
//!
//! These are the wire-facing shapes. Conversions into the database request
//! types live in [`crate::db::models`].

pub mod auth;
pub mod clients;
pub mod pagination;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod room_types;
pub mod rooms;
pub mod services;
pub mod users;
