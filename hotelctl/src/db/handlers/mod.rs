//! Repository implementations for database access.
//!
//! This module provides repository structs for each major entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Uses the connection's transaction for ACID guarantees
//!
//! # Available Repositories
//!
//! - [`Users`]: Staff account management and authentication lookups
//! - [`Clients`]: Guest records
//! - [`RoomTypes`]: Room categories
//! - [`Rooms`]: Rooms, including the availability and overlap queries
//! - [`Reservations`]: Reservations and their line items
//! - [`Payments`]: Payment records
//! - [`Services`]: Extra hotel services
//! - [`Reports`]: Read-only aggregate reporting queries
//!
//! # Common Pattern
//!
//! All repositories follow this usage pattern:
//!
//! ```ignore
//! use hotelctl::db::handlers::{Rooms, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Rooms::new(&mut tx);
//!     let rooms = repo.list(&Default::default()).await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod payments;
pub mod reports;
pub mod repository;
pub mod reservations;
pub mod room_types;
pub mod rooms;
pub mod services;
pub mod users;

pub use clients::Clients;
pub use payments::Payments;
pub use reports::Reports;
pub use repository::Repository;
pub use reservations::Reservations;
pub use room_types::RoomTypes;
pub use rooms::Rooms;
pub use services::Services;
pub use users::Users;
