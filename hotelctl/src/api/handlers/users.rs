//! Staff user management. Admin only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        users::{CurrentUser, UserCreate, UserResponse, UserUpdate},
    },
    auth::{current_user::require_admin, password},
    db::{
        errors::DbError,
        handlers::{users::UserFilter, Repository, Users},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::{Error, Result},
    types::UserId,
    AppState,
};

async fn hash_password(state: &AppState, plain: String) -> Result<String> {
    let policy = &state.config.auth.native.password;
    if plain.len() < policy.min_length || plain.len() > policy.max_length {
        return Err(Error::BadRequest {
            message: format!(
                "Password must be between {} and {} characters",
                policy.min_length, policy.max_length
            ),
        });
    }

    tokio::task::spawn_blocking(move || password::hash_string(&plain))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("password hashing task: {e}"),
        })?
}

/// Create a staff user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Username or email taken"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    require_admin(&user)?;

    let password_hash = match request.password.clone() {
        Some(plain) => Some(hash_password(&state, plain).await?),
        None => None,
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let created = Users::new(&mut conn)
        .create(&UserCreateDBRequest::from_api(request, password_hash))
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List staff users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(Pagination),
    responses(
        (status = 200, description = "Users", body = PaginatedResponse<UserResponse>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<UserResponse>>> {
    require_admin(&user)?;

    let (skip, limit) = pagination.params();
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Users::new(&mut conn);

    let users = repo.list(&UserFilter::new(skip, limit)).await?;
    let total_count = repo.count().await?;

    Ok(Json(PaginatedResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
        total_count,
        skip,
        limit,
    )))
}

/// Fetch one staff user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>> {
    require_admin(&user)?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let found = Users::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "user".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(found.into()))
}

/// Update a staff user.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<UserId>,
    Json(request): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    require_admin(&user)?;

    let mut db_request = UserUpdateDBRequest::new(request.clone());
    if let Some(plain) = request.password {
        db_request.password_hash = Some(hash_password(&state, plain).await?);
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Users::new(&mut conn).update(id, &db_request).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "user".to_string(),
            id: id.to_string(),
        },
        other => other.into(),
    })?;

    Ok(Json(updated.into()))
}

/// Deactivate a staff user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(State(state): State<AppState>, user: CurrentUser, Path(id): Path<UserId>) -> Result<StatusCode> {
    require_admin(&user)?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Users::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "user".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
