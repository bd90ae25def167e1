//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **SQLx Integration**: Response models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models to allow
//!   independent evolution of storage and API representations
//!
//! # Conversion to API Models
//!
//! Database models typically implement `From` conversions to API models:
//!
//! ```ignore
//! use hotelctl::db::models::rooms::RoomDBResponse;
//! use hotelctl::api::models::rooms::RoomResponse;
//!
//! let db_room: RoomDBResponse = /* ... */;
//! let api_response: RoomResponse = db_room.into();
//! ```

pub mod clients;
pub mod payments;
pub mod reservations;
pub mod room_types;
pub mod rooms;
pub mod services;
pub mod users;
