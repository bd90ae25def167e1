//! Database repository for extra hotel services.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::services::{ServiceCreateDBRequest, ServiceDBResponse, ServiceUpdateDBRequest},
};
use crate::types::{abbrev_uuid, ServiceId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing services
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    pub skip: i64,
    pub limit: i64,
    pub include_inactive: bool,
}

impl ServiceFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            include_inactive: false,
        }
    }
}

pub struct Services<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Services<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip_all, err)]
    pub async fn count(&mut self, filter: &ServiceFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services WHERE active OR $1")
            .bind(filter.include_inactive)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Services<'c> {
    type CreateRequest = ServiceCreateDBRequest;
    type UpdateRequest = ServiceUpdateDBRequest;
    type Response = ServiceDBResponse;
    type Id = ServiceId;
    type Filter = ServiceFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let service = sqlx::query_as::<_, ServiceDBResponse>(
            r#"
            INSERT INTO services (id, name, description, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(service)
    }

    #[instrument(skip(self), fields(service_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let service = sqlx::query_as::<_, ServiceDBResponse>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(service)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<ServiceId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let services = sqlx::query_as::<_, ServiceDBResponse>("SELECT * FROM services WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(services.into_iter().map(|s| (s.id, s)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let services = sqlx::query_as::<_, ServiceDBResponse>(
            "SELECT * FROM services WHERE active OR $3 ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .bind(filter.include_inactive)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(services)
    }

    /// Soft delete: marks the service inactive.
    #[instrument(skip(self), fields(service_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("UPDATE services SET active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(service_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let service = sqlx::query_as::<_, ServiceDBResponse>(
            r#"
            UPDATE services SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(service)
    }
}
