//! Reporting endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    api::models::{
        reports::{PopularRoomResponse, RevenueQuery, RevenueResponse, StatusCountResponse},
        users::CurrentUser,
    },
    db::{errors::DbError, handlers::Reports},
    errors::{Error, Result},
    AppState,
};

const POPULAR_ROOMS_LIMIT: i64 = 10;

/// Reservation counts per status.
#[utoipa::path(
    get,
    path = "/reports/reservations-by-status",
    tag = "reports",
    responses((status = 200, description = "Counts per status", body = [StatusCountResponse])),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn reservations_by_status(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<StatusCountResponse>>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let rows = Reports::new(&mut conn).reservations_by_status().await?;

    Ok(Json(rows.into_iter().map(StatusCountResponse::from).collect()))
}

/// Daily revenue from payments over a date window.
#[utoipa::path(
    get,
    path = "/reports/revenue",
    tag = "reports",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue per day", body = [RevenueResponse]),
        (status = 400, description = "start is after end"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn revenue(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<Vec<RevenueResponse>>> {
    if query.start > query.end {
        return Err(Error::BadRequest {
            message: "start date must not be after end date".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let rows = Reports::new(&mut conn).revenue_by_day(query.start, query.end).await?;

    Ok(Json(rows.into_iter().map(RevenueResponse::from).collect()))
}

/// Most-booked rooms, cancelled reservations excluded.
#[utoipa::path(
    get,
    path = "/reports/popular-rooms",
    tag = "reports",
    responses((status = 200, description = "Rooms by booking count", body = [PopularRoomResponse])),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn popular_rooms(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<Vec<PopularRoomResponse>>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let rows = Reports::new(&mut conn).popular_rooms(POPULAR_ROOMS_LIMIT).await?;

    Ok(Json(rows.into_iter().map(PopularRoomResponse::from).collect()))
}
