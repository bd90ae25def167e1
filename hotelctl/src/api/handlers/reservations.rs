//! Reservation booking and lifecycle.
//!
//! Booking is a single transaction: the client check, room locks, the
//! overlap re-check, line-item inserts and the total update either all
//! commit or none do. The rooms are locked with `FOR UPDATE` and the
//! overlap query runs after the locks are held, so two concurrent bookings
//! of the same room cannot both succeed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use std::collections::HashMap;

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        reservations::{
            BookingResponse, ReservationCreate, ReservationListQuery, ReservationResponse, ReservationStatus,
            ReservationUpdate, RoomSetUpdate,
        },
        rooms::RoomStatus,
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{reservations::ReservationFilter, Clients, Repository, Reservations, Rooms},
        models::reservations::{ReservationCreateDBRequest, ReservationUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{ReservationId, RoomId},
    AppState,
};

fn validate_range(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::BadRequest {
            message: "start date must not be after end date".to_string(),
        });
    }
    Ok(())
}

fn dedupe(ids: &[RoomId]) -> Vec<RoomId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn reservation_not_found(id: ReservationId) -> Error {
    Error::NotFound {
        resource: "reservation".to_string(),
        id: id.to_string(),
    }
}

/// Lock the requested rooms, verify each exists, is bookable and free for
/// the range, then attach them with price snapshots and store the total.
///
/// Any missing or inactive room id fails the whole call; partial bookings
/// are never committed.
async fn attach_rooms(
    tx: &mut PgConnection,
    reservation_id: ReservationId,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    room_ids: &[RoomId],
) -> Result<Decimal> {
    let ids = dedupe(room_ids);

    let locked = Rooms::new(&mut *tx).lock_many(&ids).await?;
    let by_id: HashMap<RoomId, _> = locked.into_iter().map(|r| (r.id, r)).collect();

    let mut total = Decimal::ZERO;
    for id in &ids {
        let room = by_id
            .get(id)
            .filter(|r| r.status != RoomStatus::Inactive)
            .ok_or_else(|| Error::NotFound {
                resource: "room".to_string(),
                id: id.to_string(),
            })?;

        // Re-checked under the lock; items of this reservation are ignored
        // so room-set replacement does not conflict with itself
        let overlapping = Rooms::new(&mut *tx)
            .has_overlap(room.id, start, end, Some(reservation_id))
            .await?;
        if overlapping {
            return Err(Error::Conflict {
                message: format!("Room {} is not available for the requested dates", room.number),
            });
        }

        Reservations::new(&mut *tx)
            .add_line_item(reservation_id, room.id, room.price)
            .await?;
        total += room.price;
    }

    Reservations::new(&mut *tx).set_total(reservation_id, total).await?;
    Ok(total)
}

/// Book a reservation: one client, a date range, one or more rooms.
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = ReservationCreate,
    responses(
        (status = 201, description = "Reservation booked", body = BookingResponse),
        (status = 400, description = "Invalid date range or no rooms"),
        (status = 404, description = "Unknown client or room"),
        (status = 409, description = "A requested room is not available"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_reservation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<ReservationCreate>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    validate_range(request.start_date, request.end_date)?;
    if request.room_ids.is_empty() {
        return Err(Error::BadRequest {
            message: "at least one room id is required".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    Clients::new(&mut tx)
        .get_by_id(request.client_id)
        .await?
        .filter(|c| c.active)
        .ok_or_else(|| Error::NotFound {
            resource: "client".to_string(),
            id: request.client_id.to_string(),
        })?;

    let reservation = Reservations::new(&mut tx)
        .create(&ReservationCreateDBRequest {
            client_id: request.client_id,
            start_date: request.start_date,
            end_date: request.end_date,
        })
        .await?;

    let total = attach_rooms(
        &mut tx,
        reservation.id,
        request.start_date,
        request.end_date,
        &request.room_ids,
    )
    .await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            reservation_id: reservation.id,
            total,
        }),
    ))
}

/// List reservations, optionally filtered by status or client.
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    params(Pagination, ReservationListQuery),
    responses((status = 200, description = "Reservations", body = PaginatedResponse<ReservationResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_reservations(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<PaginatedResponse<ReservationResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Reservations::new(&mut conn);

    let mut filter = ReservationFilter::new(skip, limit);
    filter.status = query.status;
    filter.client_id = query.client_id;

    let reservations = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let ids: Vec<ReservationId> = reservations.iter().map(|r| r.id).collect();
    let mut items = repo.line_items_bulk(&ids).await?;

    let data = reservations
        .into_iter()
        .map(|r| {
            let rooms = items.remove(&r.id).unwrap_or_default();
            ReservationResponse::from_parts(r, rooms)
        })
        .collect();

    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Fetch one reservation with its rooms.
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ReservationResponse),
        (status = 404, description = "No such reservation"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_reservation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
) -> Result<Json<ReservationResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Reservations::new(&mut conn);

    let reservation = repo.get_by_id(id).await?.ok_or_else(|| reservation_not_found(id))?;
    let items = repo.line_items(id).await?;

    Ok(Json(ReservationResponse::from_parts(reservation, items)))
}

/// Change the stay dates of a planned reservation. Every room already on
/// the reservation must be free for the new range.
#[utoipa::path(
    patch,
    path = "/reservations/{id}",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    request_body = ReservationUpdate,
    responses(
        (status = 200, description = "Updated reservation", body = ReservationResponse),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "No such reservation"),
        (status = 409, description = "Not planned, or a room is unavailable"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_reservation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
    Json(request): Json<ReservationUpdate>,
) -> Result<Json<ReservationResponse>> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let reservation = Reservations::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    if reservation.status != ReservationStatus::Planned {
        return Err(Error::Conflict {
            message: "Only planned reservations can be re-dated".to_string(),
        });
    }

    let start = request.start_date.unwrap_or(reservation.start_date);
    let end = request.end_date.unwrap_or(reservation.end_date);
    validate_range(start, end)?;

    let room_ids = Reservations::new(&mut tx).room_ids(id).await?;
    Rooms::new(&mut tx).lock_many(&room_ids).await?;
    for room_id in &room_ids {
        let overlapping = Rooms::new(&mut tx).has_overlap(*room_id, start, end, Some(id)).await?;
        if overlapping {
            return Err(Error::Conflict {
                message: "A booked room is not available for the new dates".to_string(),
            });
        }
    }

    let mut repo = Reservations::new(&mut tx);
    let updated = repo
        .update(
            id,
            &ReservationUpdateDBRequest {
                start_date: request.start_date,
                end_date: request.end_date,
            },
        )
        .await?;
    let items = repo.line_items(id).await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(ReservationResponse::from_parts(updated, items)))
}

/// Replace the room set of a planned reservation. Prices are snapshotted
/// afresh and the total recomputed.
#[utoipa::path(
    put,
    path = "/reservations/{id}/rooms",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    request_body = RoomSetUpdate,
    responses(
        (status = 200, description = "Updated reservation", body = ReservationResponse),
        (status = 400, description = "Empty room set"),
        (status = 404, description = "No such reservation or room"),
        (status = 409, description = "Not planned, or a room is unavailable"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn replace_rooms(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
    Json(request): Json<RoomSetUpdate>,
) -> Result<Json<ReservationResponse>> {
    if request.room_ids.is_empty() {
        return Err(Error::BadRequest {
            message: "at least one room id is required".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let reservation = Reservations::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    if reservation.status != ReservationStatus::Planned {
        return Err(Error::Conflict {
            message: "Rooms can only be changed while a reservation is planned".to_string(),
        });
    }

    Reservations::new(&mut tx).delete_line_items(id).await?;
    attach_rooms(&mut tx, id, reservation.start_date, reservation.end_date, &request.room_ids).await?;

    let mut repo = Reservations::new(&mut tx);
    let updated = repo.get_by_id(id).await?.ok_or_else(|| reservation_not_found(id))?;
    let items = repo.line_items(id).await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(ReservationResponse::from_parts(updated, items)))
}

/// Cancel a reservation. Cancelled rooms become available again at once.
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Cancelled reservation", body = ReservationResponse),
        (status = 404, description = "No such reservation"),
        (status = 409, description = "Already cancelled or finished"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
) -> Result<Json<ReservationResponse>> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let reservation = Reservations::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;

    if reservation.status == ReservationStatus::Cancelled {
        return Err(Error::Conflict {
            message: "Reservation is already cancelled".to_string(),
        });
    }
    if !reservation.status.can_transition_to(ReservationStatus::Cancelled) {
        return Err(Error::Conflict {
            message: "A finished reservation cannot be cancelled".to_string(),
        });
    }

    let updated = Reservations::new(&mut tx)
        .set_status(id, ReservationStatus::Cancelled)
        .await?;

    // A guest being checked out early frees their rooms
    if reservation.status == ReservationStatus::Occupied {
        let room_ids = Reservations::new(&mut tx).room_ids(id).await?;
        Rooms::new(&mut tx).set_status_many(&room_ids, RoomStatus::Available).await?;
    }

    let items = Reservations::new(&mut tx).line_items(id).await?;
    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(ReservationResponse::from_parts(updated, items)))
}

/// Check the guest in: reservation becomes occupied, as do its rooms.
#[utoipa::path(
    post,
    path = "/reservations/{id}/check-in",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Checked in", body = ReservationResponse),
        (status = 404, description = "No such reservation"),
        (status = 409, description = "Reservation is not planned"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn check_in(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
) -> Result<Json<ReservationResponse>> {
    transition(state, id, ReservationStatus::Occupied, RoomStatus::Occupied).await
}

/// Check the guest out: reservation finishes and its rooms free up.
#[utoipa::path(
    post,
    path = "/reservations/{id}/check-out",
    tag = "reservations",
    params(("id" = uuid::Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Checked out", body = ReservationResponse),
        (status = 404, description = "No such reservation"),
        (status = 409, description = "Reservation is not occupied"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn check_out(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<ReservationId>,
) -> Result<Json<ReservationResponse>> {
    transition(state, id, ReservationStatus::Finished, RoomStatus::Available).await
}

async fn transition(
    state: AppState,
    id: ReservationId,
    target: ReservationStatus,
    room_status: RoomStatus,
) -> Result<Json<ReservationResponse>> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let reservation = Reservations::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    if !reservation.status.can_transition_to(target) {
        return Err(Error::Conflict {
            message: format!(
                "Reservation cannot move from {:?} to {:?}",
                reservation.status, target
            )
            .to_lowercase(),
        });
    }

    let updated = Reservations::new(&mut tx).set_status(id, target).await?;

    let room_ids = Reservations::new(&mut tx).room_ids(id).await?;
    Rooms::new(&mut tx).set_status_many(&room_ids, room_status).await?;

    let items = Reservations::new(&mut tx).line_items(id).await?;
    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(ReservationResponse::from_parts(updated, items)))
}
