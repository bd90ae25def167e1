//! Database repository for hotel guests.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientUpdateDBRequest},
};
use crate::types::{abbrev_uuid, ClientId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing clients
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub skip: i64,
    pub limit: i64,
    /// When false, deactivated clients are excluded from listings.
    pub include_inactive: bool,
}

impl ClientFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            include_inactive: false,
        }
    }
}

pub struct Clients<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Clients<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Count clients visible under the given filter.
    #[instrument(skip_all, err)]
    pub async fn count(&mut self, filter: &ClientFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE active OR $1")
            .bind(filter.include_inactive)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Clients<'c> {
    type CreateRequest = ClientCreateDBRequest;
    type UpdateRequest = ClientUpdateDBRequest;
    type Response = ClientDBResponse;
    type Id = ClientId;
    type Filter = ClientFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let client = sqlx::query_as::<_, ClientDBResponse>(
            r#"
            INSERT INTO clients (id, full_name, email, phone, document_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.document_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(client)
    }

    #[instrument(skip(self), fields(client_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let client = sqlx::query_as::<_, ClientDBResponse>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(client)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<ClientId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let clients = sqlx::query_as::<_, ClientDBResponse>("SELECT * FROM clients WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(clients.into_iter().map(|c| (c.id, c)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let clients = sqlx::query_as::<_, ClientDBResponse>(
            "SELECT * FROM clients WHERE active OR $3 ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .bind(filter.include_inactive)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(clients)
    }

    /// Soft delete: deactivates the client, preserving reservation history.
    #[instrument(skip(self), fields(client_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("UPDATE clients SET active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(client_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let client = sqlx::query_as::<_, ClientDBResponse>(
            r#"
            UPDATE clients SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                document_id = COALESCE($5, document_id),
                active = COALESCE($6, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.document_id)
        .bind(request.active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn create_request(name: &str, email: &str) -> ClientCreateDBRequest {
        ClientCreateDBRequest {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: None,
            document_id: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_clients(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Clients::new(&mut conn);

        repo.create(&create_request("Ada Guest", "ada@example.com")).await.unwrap();
        repo.create(&create_request("Bo Guest", "bo@example.com")).await.unwrap();

        let listed = repo.list(&ClientFilter::new(0, 10)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(repo.count(&ClientFilter::new(0, 10)).await.unwrap(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_email_rejected(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Clients::new(&mut conn);

        repo.create(&create_request("Ada Guest", "ada@example.com")).await.unwrap();
        let err = repo.create(&create_request("Imposter", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_deactivated_clients_hidden_from_default_listing(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Clients::new(&mut conn);

        let client = repo.create(&create_request("Ada Guest", "ada@example.com")).await.unwrap();
        assert!(repo.delete(client.id).await.unwrap());

        let listed = repo.list(&ClientFilter::new(0, 10)).await.unwrap();
        assert!(listed.is_empty());

        let mut all = ClientFilter::new(0, 10);
        all.include_inactive = true;
        let listed = repo.list(&all).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].active);
    }
}
