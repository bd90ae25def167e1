//! Database repository for payments.
//!
//! Payments are append-only: they can be recorded and listed but never
//! updated or removed, so this repository does not implement the generic
//! [`crate::db::handlers::Repository`] trait.

use crate::db::{
    errors::Result,
    models::payments::{PaymentCreateDBRequest, PaymentDBResponse},
};
use crate::types::{abbrev_uuid, PaymentId, ReservationId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing payments
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub skip: i64,
    pub limit: i64,
    pub reservation_id: Option<ReservationId>,
}

impl PaymentFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            reservation_id: None,
        }
    }
}

pub struct Payments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Payments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(reservation_id = %abbrev_uuid(&request.reservation_id)), err)]
    pub async fn create(&mut self, request: &PaymentCreateDBRequest) -> Result<PaymentDBResponse> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>(
            r#"
            INSERT INTO payments (id, reservation_id, amount, method)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.reservation_id)
        .bind(request.amount)
        .bind(request.method)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(payment)
    }

    #[instrument(skip(self), fields(payment_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: PaymentId) -> Result<Option<PaymentDBResponse>> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(payment)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    pub async fn list(&mut self, filter: &PaymentFilter) -> Result<Vec<PaymentDBResponse>> {
        let payments = sqlx::query_as::<_, PaymentDBResponse>(
            r#"
            SELECT * FROM payments
            WHERE $3::uuid IS NULL OR reservation_id = $3
            ORDER BY paid_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .bind(filter.reservation_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(payments)
    }

    #[instrument(skip_all, err)]
    pub async fn count(&mut self, filter: &PaymentFilter) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE $1::uuid IS NULL OR reservation_id = $1")
                .bind(filter.reservation_id)
                .fetch_one(&mut *self.db)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::payments::PaymentMethod;
    use crate::db::errors::DbError;
    use crate::db::handlers::{Clients, Repository, Reservations};
    use crate::db::models::clients::ClientCreateDBRequest;
    use crate::db::models::reservations::ReservationCreateDBRequest;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    async fn seed_reservation(conn: &mut PgConnection) -> ReservationId {
        let client = Clients::new(conn)
            .create(&ClientCreateDBRequest {
                full_name: "Guest".to_string(),
                email: format!("{}@example.com", Uuid::new_v4().simple()),
                phone: None,
                document_id: None,
            })
            .await
            .unwrap();

        Reservations::new(conn)
            .create(&ReservationCreateDBRequest {
                client_id: client.id,
                start_date: "2024-06-01".parse().unwrap(),
                end_date: "2024-06-03".parse().unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_record_and_sum_payments(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let reservation_id = seed_reservation(&mut conn).await;

        let mut repo = Payments::new(&mut conn);
        repo.create(&PaymentCreateDBRequest {
            reservation_id,
            amount: Decimal::from(100),
            method: PaymentMethod::Card,
        })
        .await
        .unwrap();
        repo.create(&PaymentCreateDBRequest {
            reservation_id,
            amount: Decimal::from(50),
            method: PaymentMethod::Cash,
        })
        .await
        .unwrap();

        let mut filter = PaymentFilter::new(0, 10);
        filter.reservation_id = Some(reservation_id);
        let payments = repo.list(&filter).await.unwrap();
        assert_eq!(payments.len(), 2);
        let sum: Decimal = payments.iter().map(|p| p.amount).sum();
        assert_eq!(sum, Decimal::from(150));
        assert_eq!(repo.count(&filter).await.unwrap(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_payment_requires_existing_reservation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = Payments::new(&mut conn)
            .create(&PaymentCreateDBRequest {
                reservation_id: Uuid::new_v4(),
                amount: Decimal::from(100),
                method: PaymentMethod::Card,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_non_positive_amount_rejected(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let reservation_id = seed_reservation(&mut conn).await;

        let err = Payments::new(&mut conn)
            .create(&PaymentCreateDBRequest {
                reservation_id,
                amount: Decimal::ZERO,
                method: PaymentMethod::Transfer,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
