//! Database models for payments.

use crate::api::models::payments::{PaymentCreate, PaymentMethod};
use crate::types::{PaymentId, ReservationId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database request for recording a payment
#[derive(Debug, Clone)]
pub struct PaymentCreateDBRequest {
    pub reservation_id: ReservationId,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

impl From<PaymentCreate> for PaymentCreateDBRequest {
    fn from(api: PaymentCreate) -> Self {
        Self {
            reservation_id: api.reservation_id,
            amount: api.amount,
            method: api.method,
        }
    }
}

/// Database response for a payment
#[derive(Debug, Clone, FromRow)]
pub struct PaymentDBResponse {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}
