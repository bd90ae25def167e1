//! Extra-service API types.

use crate::db::models::services::ServiceDBResponse;
use crate::types::ServiceId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceDBResponse> for ServiceResponse {
    fn from(service: ServiceDBResponse) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            price: service.price,
            active: service.active,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}
