//! Rooms and the availability query.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        rooms::{AvailabilityQuery, RoomCreate, RoomResponse, RoomUpdate},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{rooms::RoomFilter, Repository, RoomTypes, Rooms},
    },
    errors::{Error, Result},
    types::RoomId,
    AppState,
};

/// Create a room.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = RoomCreate,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 404, description = "No such room type"),
        (status = 409, description = "Room number taken"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_room(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<RoomCreate>,
) -> Result<(StatusCode, Json<RoomResponse>)> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    RoomTypes::new(&mut conn)
        .get_by_id(request.room_type_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "room type".to_string(),
            id: request.room_type_id.to_string(),
        })?;

    let created = Rooms::new(&mut conn).create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List rooms.
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    params(Pagination),
    responses((status = 200, description = "Rooms", body = PaginatedResponse<RoomResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<RoomResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Rooms::new(&mut conn);

    let filter = RoomFilter::new(skip, limit);
    let rooms = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        rooms.into_iter().map(RoomResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Rooms free for a date range. Both bounds are inclusive; cancelled
/// reservations never block a room.
#[utoipa::path(
    get,
    path = "/rooms/available",
    tag = "rooms",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Available rooms, ordered by number", body = [RoomResponse]),
        (status = 400, description = "start is after end"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn available_rooms(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomResponse>>> {
    if query.start > query.end {
        return Err(Error::BadRequest {
            message: "start date must not be after end date".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let rooms = Rooms::new(&mut conn).find_available(query.start, query.end).await?;

    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Fetch one room.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = uuid::Uuid, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room", body = RoomResponse),
        (status = 404, description = "No such room"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_room(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = Rooms::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "room".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(found.into()))
}

/// Update a room. Price changes never touch existing price snapshots.
#[utoipa::path(
    patch,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = uuid::Uuid, Path, description = "Room id")),
    request_body = RoomUpdate,
    responses(
        (status = 200, description = "Updated room", body = RoomResponse),
        (status = 404, description = "No such room"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_room(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<RoomId>,
    Json(request): Json<RoomUpdate>,
) -> Result<Json<RoomResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Rooms::new(&mut conn).update(id, &request.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "room".to_string(),
            id: id.to_string(),
        },
        other => other.into(),
    })?;

    Ok(Json(updated.into()))
}

/// Retire a room. It disappears from availability but keeps its history.
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = uuid::Uuid, Path, description = "Room id")),
    responses(
        (status = 204, description = "Room retired"),
        (status = 404, description = "No such room"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_room(State(state): State<AppState>, _user: CurrentUser, Path(id): Path<RoomId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Rooms::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "room".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
