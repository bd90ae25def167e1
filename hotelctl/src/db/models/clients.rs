//! Database models for hotel guests.

use crate::api::models::clients::{ClientCreate, ClientUpdate};
use crate::types::ClientId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new client
#[derive(Debug, Clone)]
pub struct ClientCreateDBRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document_id: Option<String>,
}

impl From<ClientCreate> for ClientCreateDBRequest {
    fn from(api: ClientCreate) -> Self {
        Self {
            full_name: api.full_name,
            email: api.email,
            phone: api.phone,
            document_id: api.document_id,
        }
    }
}

/// Database request for updating a client
#[derive(Debug, Clone, Default)]
pub struct ClientUpdateDBRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_id: Option<String>,
    pub active: Option<bool>,
}

impl From<ClientUpdate> for ClientUpdateDBRequest {
    fn from(api: ClientUpdate) -> Self {
        Self {
            full_name: api.full_name,
            email: api.email,
            phone: api.phone,
            document_id: api.document_id,
            active: api.active,
        }
    }
}

/// Database response for a client
#[derive(Debug, Clone, FromRow)]
pub struct ClientDBResponse {
    pub id: ClientId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
