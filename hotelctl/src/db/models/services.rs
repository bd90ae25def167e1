//! Database models for extra hotel services.

use crate::api::models::services::{ServiceCreate, ServiceUpdate};
use crate::types::ServiceId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database request for creating a service
#[derive(Debug, Clone)]
pub struct ServiceCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl From<ServiceCreate> for ServiceCreateDBRequest {
    fn from(api: ServiceCreate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            price: api.price,
        }
    }
}

/// Database request for updating a service
#[derive(Debug, Clone, Default)]
pub struct ServiceUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

impl From<ServiceUpdate> for ServiceUpdateDBRequest {
    fn from(api: ServiceUpdate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            price: api.price,
            active: api.active,
        }
    }
}

/// Database response for a service
#[derive(Debug, Clone, FromRow)]
pub struct ServiceDBResponse {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
