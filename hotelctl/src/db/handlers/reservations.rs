//! Database repository for reservations and their room line items.
//!
//! A reservation row is created in `planned` status with a zero total. Line
//! items carry the room price snapshotted at booking time; the stored total
//! is the sum of those snapshots and is recomputed whenever the room set
//! changes. The booking orchestration itself lives in the API layer so the
//! overlap check, line-item inserts and total update share one transaction.

use crate::api::models::reservations::ReservationStatus;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::reservations::{
        LineItemDBResponse, ReservationCreateDBRequest, ReservationDBResponse, ReservationUpdateDBRequest,
    },
};
use crate::types::{abbrev_uuid, ClientId, ReservationId, RoomId};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing reservations
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<ReservationStatus>,
    pub client_id: Option<ClientId>,
}

impl ReservationFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
            client_id: None,
        }
    }
}

pub struct Reservations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reservations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Line items of a reservation, ordered by creation time.
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&reservation_id)), err)]
    pub async fn line_items(&mut self, reservation_id: ReservationId) -> Result<Vec<LineItemDBResponse>> {
        let items = sqlx::query_as::<_, LineItemDBResponse>(
            "SELECT * FROM reservation_line_items WHERE reservation_id = $1 ORDER BY created_at",
        )
        .bind(reservation_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(items)
    }

    /// Line items for several reservations at once, grouped by reservation.
    ///
    /// One query regardless of how many reservations are listed.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn line_items_bulk(
        &mut self,
        ids: &[ReservationId],
    ) -> Result<HashMap<ReservationId, Vec<LineItemDBResponse>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sqlx::query_as::<_, LineItemDBResponse>(
            "SELECT * FROM reservation_line_items WHERE reservation_id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(&mut *self.db)
        .await?;

        let mut grouped: HashMap<ReservationId, Vec<LineItemDBResponse>> = HashMap::new();
        for item in items {
            grouped.entry(item.reservation_id).or_default().push(item);
        }

        Ok(grouped)
    }

    /// Attach a room to a reservation, snapshotting the given price.
    #[instrument(
        skip(self),
        fields(reservation_id = %abbrev_uuid(&reservation_id), room_id = %abbrev_uuid(&room_id)),
        err
    )]
    pub async fn add_line_item(
        &mut self,
        reservation_id: ReservationId,
        room_id: RoomId,
        price: Decimal,
    ) -> Result<LineItemDBResponse> {
        let item = sqlx::query_as::<_, LineItemDBResponse>(
            r#"
            INSERT INTO reservation_line_items (id, reservation_id, room_id, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reservation_id)
        .bind(room_id)
        .bind(price)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(item)
    }

    /// Remove all line items of a reservation. Used when replacing the room
    /// set; the caller recreates the items and recomputes the total in the
    /// same transaction.
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&reservation_id)), err)]
    pub async fn delete_line_items(&mut self, reservation_id: ReservationId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM reservation_line_items WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Store the derived total. Always called alongside line-item changes.
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&id)), err)]
    pub async fn set_total(&mut self, id: ReservationId, total: Decimal) -> Result<ReservationDBResponse> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            "UPDATE reservations SET total = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(total)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(reservation)
    }

    /// Move a reservation to a new status. Transition legality is checked by
    /// the caller against [`ReservationStatus::can_transition_to`].
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&id), status = ?status), err)]
    pub async fn set_status(&mut self, id: ReservationId, status: ReservationStatus) -> Result<ReservationDBResponse> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(reservation)
    }

    /// Room ids currently attached to a reservation.
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&reservation_id)), err)]
    pub async fn room_ids(&mut self, reservation_id: ReservationId) -> Result<Vec<RoomId>> {
        let ids = sqlx::query_scalar::<_, RoomId>(
            "SELECT room_id FROM reservation_line_items WHERE reservation_id = $1 ORDER BY created_at",
        )
        .bind(reservation_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(ids)
    }

    #[instrument(skip_all, err)]
    pub async fn count(&mut self, filter: &ReservationFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE ($1::reservation_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            "#,
        )
        .bind(filter.status)
        .bind(filter.client_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Reservations<'c> {
    type CreateRequest = ReservationCreateDBRequest;
    type UpdateRequest = ReservationUpdateDBRequest;
    type Response = ReservationDBResponse;
    type Id = ReservationId;
    type Filter = ReservationFilter;

    #[instrument(skip(self, request), fields(client_id = %abbrev_uuid(&request.client_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            INSERT INTO reservations (id, client_id, start_date, end_date, status, total)
            VALUES ($1, $2, $3, $4, 'planned', 0)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.client_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(reservation)
    }

    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(reservation)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<ReservationId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let reservations = sqlx::query_as::<_, ReservationDBResponse>("SELECT * FROM reservations WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(reservations.into_iter().map(|r| (r.id, r)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let reservations = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            SELECT * FROM reservations
            WHERE ($3::reservation_status IS NULL OR status = $3)
              AND ($4::uuid IS NULL OR client_id = $4)
            ORDER BY start_date DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .bind(filter.status)
        .bind(filter.client_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(reservations)
    }

    /// Hard delete; line items go with the row via ON DELETE CASCADE. The
    /// public API cancels reservations instead, this exists for cleanup.
    #[instrument(skip(self), fields(reservation_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Update the stay dates. The availability re-check for the new range is
    /// the caller's responsibility, inside the same transaction.
    #[instrument(skip(self, request), fields(reservation_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            UPDATE reservations SET
                start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(reservation)
    }
}
