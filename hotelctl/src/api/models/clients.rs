//! Guest API types.

use crate::db::models::clients::ClientDBResponse;
use crate::types::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClientCreate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_id: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ClientId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientDBResponse> for ClientResponse {
    fn from(client: ClientDBResponse) -> Self {
        Self {
            id: client.id,
            full_name: client.full_name,
            email: client.email,
            phone: client.phone,
            document_id: client.document_id,
            active: client.active,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
