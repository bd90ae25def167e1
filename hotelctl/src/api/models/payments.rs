//! Payment API types.

use crate::db::models::payments::PaymentDBResponse;
use crate::types::{PaymentId, ReservationId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentCreate {
    #[schema(value_type = String, format = "uuid")]
    pub reservation_id: ReservationId,
    /// Must be positive
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// Optional filter for the payment listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PaymentListQuery {
    #[param(value_type = Option<String>, format = "uuid")]
    pub reservation_id: Option<ReservationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PaymentId,
    #[schema(value_type = String, format = "uuid")]
    pub reservation_id: ReservationId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

impl From<PaymentDBResponse> for PaymentResponse {
    fn from(payment: PaymentDBResponse) -> Self {
        Self {
            id: payment.id,
            reservation_id: payment.reservation_id,
            amount: payment.amount,
            method: payment.method,
            paid_at: payment.paid_at,
        }
    }
}
