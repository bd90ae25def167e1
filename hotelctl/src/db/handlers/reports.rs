//! Read-only aggregate queries backing the reporting endpoints.
//!
//! Each report is a single SQL aggregation; nothing here mutates state.

use crate::api::models::reservations::ReservationStatus;
use crate::db::errors::Result;
use crate::types::RoomId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Count of reservations in one status.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCountRow {
    pub status: ReservationStatus,
    pub count: i64,
}

/// Payments received on one day.
#[derive(Debug, Clone, FromRow)]
pub struct RevenueRow {
    pub day: NaiveDate,
    pub revenue: Decimal,
}

/// Booking count for one room.
#[derive(Debug, Clone, FromRow)]
pub struct PopularRoomRow {
    pub room_id: RoomId,
    pub number: String,
    pub bookings: i64,
}

pub struct Reports<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reports<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Reservation counts grouped by status. Statuses with no reservations
    /// are absent from the result.
    #[instrument(skip(self), err)]
    pub async fn reservations_by_status(&mut self) -> Result<Vec<StatusCountRow>> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS count FROM reservations GROUP BY status ORDER BY status",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// Daily revenue from recorded payments over the inclusive range.
    #[instrument(skip(self), err)]
    pub async fn revenue_by_day(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RevenueRow>> {
        let rows = sqlx::query_as::<_, RevenueRow>(
            r#"
            SELECT paid_at::date AS day, SUM(amount) AS revenue
            FROM payments
            WHERE paid_at::date BETWEEN $1 AND $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// Rooms ranked by how many non-cancelled reservations include them.
    #[instrument(skip(self), err)]
    pub async fn popular_rooms(&mut self, limit: i64) -> Result<Vec<PopularRoomRow>> {
        let rows = sqlx::query_as::<_, PopularRoomRow>(
            r#"
            SELECT r.id AS room_id, r.number, COUNT(li.id) AS bookings
            FROM rooms r
            JOIN reservation_line_items li ON li.room_id = r.id
            JOIN reservations v ON v.id = li.reservation_id
            WHERE v.status <> 'cancelled'
            GROUP BY r.id, r.number
            ORDER BY bookings DESC, r.number
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::payments::PaymentMethod;
    use crate::db::handlers::{Clients, Payments, Repository, Reservations};
    use crate::db::models::clients::ClientCreateDBRequest;
    use crate::db::models::payments::PaymentCreateDBRequest;
    use crate::db::models::reservations::ReservationCreateDBRequest;
    use crate::types::ClientId;
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn seed_client(conn: &mut PgConnection) -> ClientId {
        Clients::new(conn)
            .create(&ClientCreateDBRequest {
                full_name: "Guest".to_string(),
                email: format!("{}@example.com", Uuid::new_v4().simple()),
                phone: None,
                document_id: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_reservation(conn: &mut PgConnection, client_id: ClientId) -> crate::types::ReservationId {
        Reservations::new(conn)
            .create(&ReservationCreateDBRequest {
                client_id,
                start_date: "2024-06-01".parse().unwrap(),
                end_date: "2024-06-03".parse().unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reservations_by_status_groups_counts(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let client_id = seed_client(&mut conn).await;

        let first = seed_reservation(&mut conn, client_id).await;
        seed_reservation(&mut conn, client_id).await;
        Reservations::new(&mut conn)
            .set_status(first, ReservationStatus::Cancelled)
            .await
            .unwrap();

        let rows = Reports::new(&mut conn).reservations_by_status().await.unwrap();
        let planned = rows.iter().find(|r| r.status == ReservationStatus::Planned).unwrap();
        let cancelled = rows.iter().find(|r| r.status == ReservationStatus::Cancelled).unwrap();
        assert_eq!(planned.count, 1);
        assert_eq!(cancelled.count, 1);
        assert!(rows.iter().all(|r| r.status != ReservationStatus::Finished));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_revenue_by_day_sums_payments(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let client_id = seed_client(&mut conn).await;
        let reservation_id = seed_reservation(&mut conn, client_id).await;

        let mut payments = Payments::new(&mut conn);
        payments
            .create(&PaymentCreateDBRequest {
                reservation_id,
                amount: Decimal::from(100),
                method: PaymentMethod::Card,
            })
            .await
            .unwrap();
        payments
            .create(&PaymentCreateDBRequest {
                reservation_id,
                amount: Decimal::from(40),
                method: PaymentMethod::Cash,
            })
            .await
            .unwrap();

        let today = chrono::Utc::now().date_naive();
        let rows = Reports::new(&mut conn).revenue_by_day(today, today).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, Decimal::from(140));

        // Outside the window nothing shows up
        let past = Reports::new(&mut conn)
            .revenue_by_day("2000-01-01".parse().unwrap(), "2000-12-31".parse().unwrap())
            .await
            .unwrap();
        assert!(past.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_popular_rooms_excludes_cancelled(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let client_id = seed_client(&mut conn).await;

        let type_id = Uuid::new_v4();
        sqlx::query("INSERT INTO room_types (id, name, capacity) VALUES ($1, 'Std', 2)")
            .bind(type_id)
            .execute(&mut *conn)
            .await
            .unwrap();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();
        for (id, number) in [(room_a, "101"), (room_b, "102")] {
            sqlx::query("INSERT INTO rooms (id, number, room_type_id, price) VALUES ($1, $2, $3, 100)")
                .bind(id)
                .bind(number)
                .bind(type_id)
                .execute(&mut *conn)
                .await
                .unwrap();
        }

        let first = seed_reservation(&mut conn, client_id).await;
        let second = seed_reservation(&mut conn, client_id).await;
        let cancelled = seed_reservation(&mut conn, client_id).await;
        let mut reservations = Reservations::new(&mut conn);
        reservations.add_line_item(first, room_a, Decimal::from(100)).await.unwrap();
        reservations.add_line_item(second, room_a, Decimal::from(100)).await.unwrap();
        reservations.add_line_item(second, room_b, Decimal::from(100)).await.unwrap();
        reservations.add_line_item(cancelled, room_b, Decimal::from(100)).await.unwrap();
        reservations.set_status(cancelled, ReservationStatus::Cancelled).await.unwrap();

        let rows = Reports::new(&mut conn).popular_rooms(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, "101");
        assert_eq!(rows[0].bookings, 2);
        assert_eq!(rows[1].number, "102");
        assert_eq!(rows[1].bookings, 1);
    }
}
