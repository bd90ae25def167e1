//! Guest records.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        clients::{ClientCreate, ClientResponse, ClientUpdate},
        pagination::{PaginatedResponse, Pagination},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{clients::ClientFilter, Clients, Repository},
    },
    errors::{Error, Result},
    types::ClientId,
    AppState,
};

/// Register a guest.
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = ClientCreate,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 409, description = "Email already registered"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<ClientCreate>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let created = Clients::new(&mut conn).create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List guests.
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    params(Pagination),
    responses((status = 200, description = "Clients", body = PaginatedResponse<ClientResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_clients(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<ClientResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Clients::new(&mut conn);

    let filter = ClientFilter::new(skip, limit);
    let clients = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        clients.into_iter().map(ClientResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Fetch one guest.
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = uuid::Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client", body = ClientResponse),
        (status = 404, description = "No such client"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ClientId>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = Clients::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "client".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(found.into()))
}

/// Update a guest.
#[utoipa::path(
    patch,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = uuid::Uuid, Path, description = "Client id")),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Updated client", body = ClientResponse),
        (status = 404, description = "No such client"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ClientId>,
    Json(request): Json<ClientUpdate>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Clients::new(&mut conn).update(id, &request.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "client".to_string(),
            id: id.to_string(),
        },
        other => other.into(),
    })?;

    Ok(Json(updated.into()))
}

/// Deactivate a guest. Their reservation history is preserved.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = uuid::Uuid, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client deactivated"),
        (status = 404, description = "No such client"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ClientId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Clients::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "client".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
