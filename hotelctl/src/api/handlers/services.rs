//! Extra hotel services.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        services::{ServiceCreate, ServiceResponse, ServiceUpdate},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{services::ServiceFilter, Repository, Services},
    },
    errors::{Error, Result},
    types::ServiceId,
    AppState,
};

/// Create a service.
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = ServiceCreate,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 409, description = "Name taken"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_service(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<ServiceCreate>,
) -> Result<(StatusCode, Json<ServiceResponse>)> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let created = Services::new(&mut conn).create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List services.
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    params(Pagination),
    responses((status = 200, description = "Services", body = PaginatedResponse<ServiceResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_services(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<ServiceResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Services::new(&mut conn);

    let filter = ServiceFilter::new(skip, limit);
    let services = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        services.into_iter().map(ServiceResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Fetch one service.
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = uuid::Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service", body = ServiceResponse),
        (status = 404, description = "No such service"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_service(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ServiceId>,
) -> Result<Json<ServiceResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = Services::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "service".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(found.into()))
}

/// Update a service.
#[utoipa::path(
    patch,
    path = "/services/{id}",
    tag = "services",
    params(("id" = uuid::Uuid, Path, description = "Service id")),
    request_body = ServiceUpdate,
    responses(
        (status = 200, description = "Updated service", body = ServiceResponse),
        (status = 404, description = "No such service"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_service(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ServiceId>,
    Json(request): Json<ServiceUpdate>,
) -> Result<Json<ServiceResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Services::new(&mut conn).update(id, &request.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "service".to_string(),
            id: id.to_string(),
        },
        other => other.into(),
    })?;

    Ok(Json(updated.into()))
}

/// Retire a service.
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    params(("id" = uuid::Uuid, Path, description = "Service id")),
    responses(
        (status = 204, description = "Service retired"),
        (status = 404, description = "No such service"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_service(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ServiceId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Services::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "service".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
