//! Login, Google OAuth and session introspection.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use uuid::Uuid;

use crate::{
    api::models::{
        auth::{GoogleCallbackQuery, LoginRequest, TokenResponse},
        users::{CurrentUser, Role},
    },
    auth::{password, session},
    db::{
        errors::DbError,
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, Result},
    AppState,
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid credentials".to_string()),
    }
}

/// Log in with username or email plus password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<TokenResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let user = Users::new(&mut conn)
        .get_by_identifier(&request.identifier)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.active {
        return Err(invalid_credentials());
    }
    let hash = user.password_hash.clone().ok_or_else(invalid_credentials)?;

    // Argon2 is deliberately slow, keep it off the async runtime
    let password = request.password;
    let verified = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("password verification task: {e}"),
        })??;
    if !verified {
        return Err(invalid_credentials());
    }

    let current_user = CurrentUser::from(user);
    let token = session::create_session_token(&current_user, &state.config)?;

    Ok(Json(TokenResponse::bearer(
        token,
        state.config.auth.security.jwt_expiry.as_secs() as i64,
    )))
}

/// Start the Google sign-in flow.
#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "auth",
    responses(
        (status = 307, description = "Redirect to Google's consent screen"),
        (status = 400, description = "Google sign-in not enabled"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn google_authorize(State(state): State<AppState>) -> Result<Redirect> {
    let google = state.google.as_ref().ok_or_else(|| Error::BadRequest {
        message: "Google sign-in is not enabled".to_string(),
    })?;

    let url = google.authorize_url(&Uuid::new_v4().to_string());
    Ok(Redirect::temporary(url.as_str()))
}

/// OAuth callback: exchange the code, provision the user if needed, issue a token.
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "auth",
    params(GoogleCallbackQuery),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Code exchange rejected"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Json<TokenResponse>> {
    let google = state.google.as_ref().ok_or_else(|| Error::BadRequest {
        message: "Google sign-in is not enabled".to_string(),
    })?;

    let profile = google.exchange_code(&query.code).await?;

    let mut tx = state.db.begin().await.map_err(DbError::from)?;
    let mut users = Users::new(&mut tx);

    let user = match users.get_by_email(&profile.email).await? {
        Some(user) => user,
        None => {
            let username = profile
                .email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("user")
                .to_string();

            users
                .create(&UserCreateDBRequest {
                    username,
                    email: profile.email.clone(),
                    role: Role::Staff,
                    auth_source: "google".to_string(),
                    password_hash: None,
                })
                .await?
        }
    };
    tx.commit().await.map_err(DbError::from)?;

    if !user.active {
        return Err(Error::Unauthenticated {
            message: Some("Account is deactivated".to_string()),
        });
    }

    let current_user = CurrentUser::from(user);
    let token = session::create_session_token(&current_user, &state.config)?;

    Ok(Json(TokenResponse::bearer(
        token,
        state.config.auth.security.jwt_expiry.as_secs() as i64,
    )))
}

/// Who am I, according to my token.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
