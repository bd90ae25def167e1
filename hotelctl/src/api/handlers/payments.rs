//! Payment recording.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        payments::{PaymentCreate, PaymentListQuery, PaymentResponse},
        reservations::ReservationStatus,
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{payments::PaymentFilter, Payments, Repository, Reservations},
    },
    errors::{Error, Result},
    types::PaymentId,
    AppState,
};

/// Record a payment against a reservation.
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = PaymentCreate,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 404, description = "No such reservation"),
        (status = 409, description = "Reservation is cancelled"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<PaymentCreate>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    if request.amount <= Decimal::ZERO {
        return Err(Error::BadRequest {
            message: "amount must be positive".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let reservation = Reservations::new(&mut tx)
        .get_by_id(request.reservation_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "reservation".to_string(),
            id: request.reservation_id.to_string(),
        })?;
    if reservation.status == ReservationStatus::Cancelled {
        return Err(Error::Conflict {
            message: "Cannot record a payment on a cancelled reservation".to_string(),
        });
    }

    let created = Payments::new(&mut tx).create(&request.into()).await?;
    tx.commit().await.map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List payments, optionally for one reservation.
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(Pagination, PaymentListQuery),
    responses((status = 200, description = "Payments", body = PaginatedResponse<PaymentResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_payments(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<PaginatedResponse<PaymentResponse>>> {
    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Payments::new(&mut conn);

    let mut filter = PaymentFilter::new(skip, limit);
    filter.reservation_id = query.reservation_id;

    let payments = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        payments.into_iter().map(PaymentResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Fetch one payment.
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(("id" = uuid::Uuid, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment", body = PaymentResponse),
        (status = 404, description = "No such payment"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_payment(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<PaymentId>,
) -> Result<Json<PaymentResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = Payments::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "payment".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(found.into()))
}
