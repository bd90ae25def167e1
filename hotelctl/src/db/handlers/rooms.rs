//! Database repository for rooms.
//!
//! Besides plain CRUD this repository owns the two queries at the heart of the
//! booking flow:
//!
//! - [`Rooms::find_available`]: rooms free for a date range (cancelled
//!   reservations do not block availability)
//! - [`Rooms::has_overlap`]: whether a single room is already held for a
//!   range, re-evaluated inside the booking transaction to close the
//!   double-booking race

use crate::api::models::rooms::RoomStatus;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::rooms::{RoomCreateDBRequest, RoomDBResponse, RoomUpdateDBRequest},
};
use crate::types::{abbrev_uuid, ReservationId, RoomId};
use chrono::NaiveDate;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing rooms
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<RoomStatus>,
}

impl RoomFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
        }
    }
}

pub struct Rooms<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Rooms<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Rooms free for the inclusive range `[start, end]`.
    ///
    /// A room is available when its status is not `inactive` and no line item
    /// of a non-cancelled reservation overlapping the range references it.
    /// Two ranges overlap iff `a.start <= b.end AND a.end >= b.start`.
    /// Ordered by room number for deterministic output.
    #[instrument(skip(self), err)]
    pub async fn find_available(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RoomDBResponse>> {
        let rooms = sqlx::query_as::<_, RoomDBResponse>(
            r#"
            SELECT r.* FROM rooms r
            WHERE r.status <> 'inactive'
              AND NOT EXISTS (
                SELECT 1
                FROM reservation_line_items li
                JOIN reservations v ON v.id = li.reservation_id
                WHERE li.room_id = r.id
                  AND v.status <> 'cancelled'
                  AND v.start_date <= $2
                  AND v.end_date >= $1
              )
            ORDER BY r.number
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rooms)
    }

    /// Whether `room_id` is already held by a non-cancelled reservation
    /// overlapping `[start, end]`, optionally ignoring one reservation
    /// (used when re-booking or re-dating an existing reservation).
    ///
    /// Must run in the same transaction as the line-item insert so the
    /// read-then-insert sequence is consistent.
    #[instrument(skip(self), fields(room_id = %abbrev_uuid(&room_id)), err)]
    pub async fn has_overlap(
        &mut self,
        room_id: RoomId,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        let overlapping = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM reservation_line_items li
                JOIN reservations v ON v.id = li.reservation_id
                WHERE li.room_id = $1
                  AND v.status <> 'cancelled'
                  AND v.start_date <= $3
                  AND v.end_date >= $2
                  AND ($4::uuid IS NULL OR v.id <> $4)
            )
            "#,
        )
        .bind(room_id)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(overlapping)
    }

    /// Lock the given rooms for the duration of the enclosing transaction and
    /// return them. Rooms are locked in id order to avoid lock-order inversion
    /// between concurrent bookings. Missing ids are simply absent from the
    /// result; callers decide whether that is an error.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn lock_many(&mut self, ids: &[RoomId]) -> Result<Vec<RoomDBResponse>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rooms = sqlx::query_as::<_, RoomDBResponse>("SELECT * FROM rooms WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rooms)
    }

    /// Flip the status of several rooms at once (check-in / check-out).
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn set_status_many(&mut self, ids: &[RoomId], status: RoomStatus) -> Result<()> {
        sqlx::query("UPDATE rooms SET status = $2, updated_at = NOW() WHERE id = ANY($1)")
            .bind(ids)
            .bind(status)
            .execute(&mut *self.db)
            .await?;

        Ok(())
    }

    #[instrument(skip_all, err)]
    pub async fn count(&mut self, filter: &RoomFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE $1::room_status IS NULL OR status = $1")
            .bind(filter.status)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Rooms<'c> {
    type CreateRequest = RoomCreateDBRequest;
    type UpdateRequest = RoomUpdateDBRequest;
    type Response = RoomDBResponse;
    type Id = RoomId;
    type Filter = RoomFilter;

    #[instrument(skip(self, request), fields(number = %request.number), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let room = sqlx::query_as::<_, RoomDBResponse>(
            r#"
            INSERT INTO rooms (id, number, room_type_id, price, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.number)
        .bind(request.room_type_id)
        .bind(request.price)
        .bind(request.status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(room)
    }

    #[instrument(skip(self), fields(room_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let room = sqlx::query_as::<_, RoomDBResponse>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(room)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<RoomId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rooms = sqlx::query_as::<_, RoomDBResponse>("SELECT * FROM rooms WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rooms.into_iter().map(|r| (r.id, r)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rooms = sqlx::query_as::<_, RoomDBResponse>(
            r#"
            SELECT * FROM rooms
            WHERE $3::room_status IS NULL OR status = $3
            ORDER BY number
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .bind(filter.status)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rooms)
    }

    /// Soft delete: rooms are never removed, only marked inactive.
    #[instrument(skip(self), fields(room_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("UPDATE rooms SET status = 'inactive', updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(room_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let room = sqlx::query_as::<_, RoomDBResponse>(
            r#"
            UPDATE rooms SET
                number = COALESCE($2, number),
                room_type_id = COALESCE($3, room_type_id),
                price = COALESCE($4, price),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.number)
        .bind(request.room_type_id)
        .bind(request.price)
        .bind(request.status)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(room)
    }
}
