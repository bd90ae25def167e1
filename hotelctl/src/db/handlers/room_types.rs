//! Database repository for room categories.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::room_types::{RoomTypeCreateDBRequest, RoomTypeDBResponse, RoomTypeUpdateDBRequest},
};
use crate::types::{abbrev_uuid, RoomTypeId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing room types
#[derive(Debug, Clone, Default)]
pub struct RoomTypeFilter {
    pub skip: i64,
    pub limit: i64,
}

impl RoomTypeFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct RoomTypes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> RoomTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM room_types")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for RoomTypes<'c> {
    type CreateRequest = RoomTypeCreateDBRequest;
    type UpdateRequest = RoomTypeUpdateDBRequest;
    type Response = RoomTypeDBResponse;
    type Id = RoomTypeId;
    type Filter = RoomTypeFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let room_type = sqlx::query_as::<_, RoomTypeDBResponse>(
            r#"
            INSERT INTO room_types (id, name, description, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.capacity)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(room_type)
    }

    #[instrument(skip(self), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let room_type = sqlx::query_as::<_, RoomTypeDBResponse>("SELECT * FROM room_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(room_type)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<RoomTypeId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let room_types = sqlx::query_as::<_, RoomTypeDBResponse>("SELECT * FROM room_types WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(room_types.into_iter().map(|t| (t.id, t)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let room_types = sqlx::query_as::<_, RoomTypeDBResponse>("SELECT * FROM room_types ORDER BY name LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(room_types)
    }

    /// Soft delete: rooms referencing the type keep their reference.
    #[instrument(skip(self), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("UPDATE room_types SET active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let room_type = sqlx::query_as::<_, RoomTypeDBResponse>(
            r#"
            UPDATE room_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                capacity = COALESCE($4, capacity),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.capacity)
        .bind(request.active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(room_type)
    }
}
