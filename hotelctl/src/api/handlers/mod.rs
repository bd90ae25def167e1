//! HTTP handlers.
//!
//! Handlers own orchestration: they open a transaction, compose the
//! repositories from [`crate::db::handlers`], and commit. Anything touching
//! more than one table happens inside a single transaction.

pub mod auth;
pub mod clients;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod room_types;
pub mod rooms;
pub mod services;
pub mod users;
