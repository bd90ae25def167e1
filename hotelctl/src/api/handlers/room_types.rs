//! Room categories.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        room_types::{RoomTypeCreate, RoomTypeResponse, RoomTypeUpdate},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{room_types::RoomTypeFilter, Repository, RoomTypes},
    },
    errors::{Error, Result},
    types::RoomTypeId,
    AppState,
};

/// Create a room type.
#[utoipa::path(
    post,
    path = "/room-types",
    tag = "room-types",
    request_body = RoomTypeCreate,
    responses(
        (status = 201, description = "Room type created", body = RoomTypeResponse),
        (status = 409, description = "Name taken"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_room_type(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<RoomTypeCreate>,
) -> Result<(StatusCode, Json<RoomTypeResponse>)> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let created = RoomTypes::new(&mut conn).create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List room types.
#[utoipa::path(
    get,
    path = "/room-types",
    tag = "room-types",
    params(Pagination),
    responses((status = 200, description = "Room types", body = PaginatedResponse<RoomTypeResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_room_types(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<RoomTypeResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = RoomTypes::new(&mut conn);

    let room_types = repo.list(&RoomTypeFilter::new(skip, limit)).await?;
    let total_count = repo.count().await?;

    Ok(Json(PaginatedResponse::new(
        room_types.into_iter().map(RoomTypeResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Fetch one room type.
#[utoipa::path(
    get,
    path = "/room-types/{id}",
    tag = "room-types",
    params(("id" = uuid::Uuid, Path, description = "Room type id")),
    responses(
        (status = 200, description = "Room type", body = RoomTypeResponse),
        (status = 404, description = "No such room type"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_room_type(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<RoomTypeId>,
) -> Result<Json<RoomTypeResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = RoomTypes::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "room type".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(found.into()))
}

/// Update a room type.
#[utoipa::path(
    patch,
    path = "/room-types/{id}",
    tag = "room-types",
    params(("id" = uuid::Uuid, Path, description = "Room type id")),
    request_body = RoomTypeUpdate,
    responses(
        (status = 200, description = "Updated room type", body = RoomTypeResponse),
        (status = 404, description = "No such room type"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_room_type(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<RoomTypeId>,
    Json(request): Json<RoomTypeUpdate>,
) -> Result<Json<RoomTypeResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = RoomTypes::new(&mut conn)
        .update(id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::NotFound {
                resource: "room type".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })?;

    Ok(Json(updated.into()))
}

/// Deactivate a room type.
#[utoipa::path(
    delete,
    path = "/room-types/{id}",
    tag = "room-types",
    params(("id" = uuid::Uuid, Path, description = "Room type id")),
    responses(
        (status = 204, description = "Room type deactivated"),
        (status = 404, description = "No such room type"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_room_type(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<RoomTypeId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = RoomTypes::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "room type".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
