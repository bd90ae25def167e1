//! # hotelctl: Hotel Reservation Management Backend
//!
//! `hotelctl` is the booking backend for a hotel: staff accounts, guests,
//! rooms and room categories, reservations with room line items, payments,
//! extra services and a handful of operational reports, all behind a RESTful
//! JSON API.
//!
//! ## Overview
//!
//! The heart of the system is the reservation flow. Staff query which rooms
//! are free for a date range, then book a reservation for a guest covering
//! one or more rooms. Booking is a single database transaction: the rooms
//! are locked, their availability is re-checked under the lock, each room's
//! current nightly rate is snapshotted onto a line item, and the reservation
//! total is stored as the sum of those snapshots. Later room price changes
//! never alter an existing reservation.
//!
//! Reservations move through a small state machine (`planned` → `occupied` →
//! `finished`, with cancellation possible until check-out). Check-in and
//! check-out flip the status of the booked rooms as a side effect, and
//! cancelled reservations release their rooms immediately.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for persistence.
//!
//! The **API layer** ([`api`]) exposes the management API under `/api/v1/*`
//! using RESTful conventions, documented via OpenAPI at `/docs`.
//!
//! The **authentication layer** ([`auth`]) issues JWT bearer tokens for
//! local username/password logins and for Google OAuth sign-in. The Google
//! client is constructed at startup and injected through [`AppState`].
//!
//! The **database layer** ([`db`]) uses the repository pattern: each entity
//! has a repository handling queries and mutations, and handlers compose
//! repositories inside transactions.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use hotelctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = hotelctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     hotelctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs
//! migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! hotelctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::{google::GoogleAuthClient, password},
    db::handlers::{Repository, Users},
    db::models::users::UserCreateDBRequest,
    openapi::ApiDoc,
};
use axum::{
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{ClientId, PaymentId, ReservationId, RoomId, RoomTypeId, ServiceId, UserId};

/// Application state shared across all request handlers.
///
/// - `db`: PostgreSQL connection pool
/// - `config`: Application configuration
/// - `google`: OAuth client, present when Google sign-in is enabled
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub google: Option<Arc<GoogleAuthClient>>,
}

/// Get the hotelctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: creates the admin on first startup, or updates the password
/// if the user already exists and a password is configured. Returns the id
/// of the created or existing admin.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(
    username: &str,
    email: &str,
    password: Option<&str>,
    db: &PgPool,
) -> Result<UserId, anyhow::Error> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_string(pwd).map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?),
        None => None,
    };

    let mut tx = db.begin().await?;
    let mut user_repo = Users::new(&mut tx);

    if let Some(existing_user) = user_repo.get_by_email(email).await? {
        if let Some(password_hash) = password_hash {
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE email = $2")
                .bind(password_hash)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        return Ok(existing_user.id);
    }

    let created_user = user_repo
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            email: email.to_string(),
            role: Role::Admin,
            auth_source: "system".to_string(),
            password_hash,
        })
        .await?;

    tx.commit().await?;
    Ok(created_user.id)
}

/// Connect to the database, run migrations and seed the admin user.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("database_url is not configured; set DATABASE_URL"))?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(database_url)
        .await?;
    migrator().run(&pool).await?;

    create_initial_admin_user(
        &config.admin_username,
        &config.admin_email,
        config.admin_password.as_deref(),
        &pool,
    )
    .await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = &config.auth.security.cors.allowed_origins;

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new().allow_origin(allow_origin))
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // Public authentication routes
    let auth_routes = Router::new()
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/google", get(api::handlers::auth::google_authorize))
        .route("/auth/google/callback", get(api::handlers::auth::google_callback))
        .route("/auth/me", get(api::handlers::auth::me));

    // Bearer-protected management routes
    let api_routes = Router::new()
        // Staff management (admin only)
        .route("/users", get(api::handlers::users::list_users))
        .route("/users", post(api::handlers::users::create_user))
        .route("/users/{id}", get(api::handlers::users::get_user))
        .route("/users/{id}", patch(api::handlers::users::update_user))
        .route("/users/{id}", delete(api::handlers::users::delete_user))
        // Guests
        .route("/clients", get(api::handlers::clients::list_clients))
        .route("/clients", post(api::handlers::clients::create_client))
        .route("/clients/{id}", get(api::handlers::clients::get_client))
        .route("/clients/{id}", patch(api::handlers::clients::update_client))
        .route("/clients/{id}", delete(api::handlers::clients::delete_client))
        // Room categories
        .route("/room-types", get(api::handlers::room_types::list_room_types))
        .route("/room-types", post(api::handlers::room_types::create_room_type))
        .route("/room-types/{id}", get(api::handlers::room_types::get_room_type))
        .route("/room-types/{id}", patch(api::handlers::room_types::update_room_type))
        .route("/room-types/{id}", delete(api::handlers::room_types::delete_room_type))
        // Rooms and availability
        .route("/rooms", get(api::handlers::rooms::list_rooms))
        .route("/rooms", post(api::handlers::rooms::create_room))
        .route("/rooms/available", get(api::handlers::rooms::available_rooms))
        .route("/rooms/{id}", get(api::handlers::rooms::get_room))
        .route("/rooms/{id}", patch(api::handlers::rooms::update_room))
        .route("/rooms/{id}", delete(api::handlers::rooms::delete_room))
        // Reservations and their lifecycle
        .route("/reservations", get(api::handlers::reservations::list_reservations))
        .route("/reservations", post(api::handlers::reservations::create_reservation))
        .route("/reservations/{id}", get(api::handlers::reservations::get_reservation))
        .route("/reservations/{id}", patch(api::handlers::reservations::update_reservation))
        .route("/reservations/{id}/rooms", put(api::handlers::reservations::replace_rooms))
        .route("/reservations/{id}/cancel", post(api::handlers::reservations::cancel_reservation))
        .route("/reservations/{id}/check-in", post(api::handlers::reservations::check_in))
        .route("/reservations/{id}/check-out", post(api::handlers::reservations::check_out))
        // Payments
        .route("/payments", get(api::handlers::payments::list_payments))
        .route("/payments", post(api::handlers::payments::create_payment))
        .route("/payments/{id}", get(api::handlers::payments::get_payment))
        // Extra services
        .route("/services", get(api::handlers::services::list_services))
        .route("/services", post(api::handlers::services::create_service))
        .route("/services/{id}", get(api::handlers::services::get_service))
        .route("/services/{id}", patch(api::handlers::services::update_service))
        .route("/services/{id}", delete(api::handlers::services::delete_service))
        // Reports
        .route(
            "/reports/reservations-by-status",
            get(api::handlers::reports::reservations_by_status),
        )
        .route("/reports/revenue", get(api::handlers::reports::revenue))
        .route("/reports/popular-rooms", get(api::handlers::reports::popular_rooms));

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", auth_routes.merge(api_routes))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations and seeds the admin user
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown signal resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting hotelctl with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        Self::new_with_pool(config, pool)
    }

    /// Create an application on an existing pool (migrations already run).
    pub fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let google = config
            .auth
            .google
            .enabled
            .then(|| Arc::new(GoogleAuthClient::new(&config.auth.google)));

        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .maybe_google(google)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "hotelctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::create_initial_admin_user;
    use crate::{
        api::models::{
            auth::TokenResponse,
            reservations::{BookingResponse, ReservationResponse, ReservationStatus},
            rooms::{RoomResponse, RoomStatus},
            users::{CurrentUser, Role},
        },
        test_utils::*,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Full booking journey: create inventory, check availability, book two
    /// rooms, get blocked on a double-book, then check in, pay and check out.
    #[sqlx::test]
    #[test_log::test]
    async fn test_booking_flow_end_to_end(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);

        // Inventory: one category, two rooms at different rates
        let room_type = create_room_type(&pool).await;
        let room_101 = create_room(&pool, room_type.id, "101", Decimal::new(120, 0)).await;
        let room_102 = create_room(&pool, room_type.id, "102", Decimal::new(180, 0)).await;

        // Register the guest through the API
        let client_response = server
            .post("/api/v1/clients")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+44 20 7946 0999"
            }))
            .await;
        assert_eq!(client_response.status_code(), 201);
        let client_id = client_response.json::<serde_json::Value>()["id"]
            .as_str()
            .unwrap()
            .parse::<uuid::Uuid>()
            .unwrap();

        // Both rooms are free for the stay
        let available = server
            .get("/api/v1/rooms/available")
            .authorization_bearer(&token)
            .add_query_param("start", "2026-09-01")
            .add_query_param("end", "2026-09-05")
            .await;
        assert_eq!(available.status_code(), 200);
        let rooms: Vec<RoomResponse> = available.json();
        assert_eq!(rooms.len(), 2);

        // Book both rooms; total is the sum of the per-room snapshots
        let booking = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-09-01",
                "end_date": "2026-09-05",
                "room_ids": [room_101.id, room_102.id]
            }))
            .await;
        assert_eq!(booking.status_code(), 201);
        let booking: BookingResponse = booking.json();
        assert_eq!(booking.total, Decimal::new(300, 0));

        // The rooms are now gone from availability for an overlapping range
        let available = server
            .get("/api/v1/rooms/available")
            .authorization_bearer(&token)
            .add_query_param("start", "2026-09-03")
            .add_query_param("end", "2026-09-04")
            .await;
        let rooms: Vec<RoomResponse> = available.json();
        assert!(rooms.is_empty());

        // A competing reservation for room 101 is rejected
        let double_book = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-09-04",
                "end_date": "2026-09-06",
                "room_ids": [room_101.id]
            }))
            .await;
        assert_eq!(double_book.status_code(), 409);

        // Check in: reservation and rooms become occupied
        let checked_in = server
            .post(&format!("/api/v1/reservations/{}/check-in", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(checked_in.status_code(), 200);
        let reservation: ReservationResponse = checked_in.json();
        assert_eq!(reservation.status, ReservationStatus::Occupied);

        let room = server
            .get(&format!("/api/v1/rooms/{}", room_101.id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(room.json::<RoomResponse>().status, RoomStatus::Occupied);

        // Record a partial payment
        let payment = server
            .post("/api/v1/payments")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "reservation_id": booking.reservation_id,
                "amount": 150,
                "method": "card"
            }))
            .await;
        assert_eq!(payment.status_code(), 201);

        // Check out: reservation finishes, rooms free up again
        let checked_out = server
            .post(&format!("/api/v1/reservations/{}/check-out", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(checked_out.status_code(), 200);
        let reservation: ReservationResponse = checked_out.json();
        assert_eq!(reservation.status, ReservationStatus::Finished);

        let room = server
            .get(&format!("/api/v1/rooms/{}", room_101.id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(room.json::<RoomResponse>().status, RoomStatus::Available);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_protected_routes_require_token(pool: PgPool) {
        let server = create_test_app(pool);

        let healthz = server.get("/healthz").await;
        assert_eq!(healthz.status_code(), 200);

        let clients = server.get("/api/v1/clients").await;
        assert_eq!(clients.status_code(), 401);

        let reservations = server.get("/api/v1/reservations").await;
        assert_eq!(reservations.status_code(), 401);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_flow(pool: PgPool) {
        let server = create_test_app(pool.clone());

        create_initial_admin_user("admin", "admin@test.com", Some("sup3r-secret-pw"), &pool)
            .await
            .expect("Failed to seed admin");

        let bad_login = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({"identifier": "admin", "password": "wrong"}))
            .await;
        assert_eq!(bad_login.status_code(), 401);

        let login = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({"identifier": "admin", "password": "sup3r-secret-pw"}))
            .await;
        assert_eq!(login.status_code(), 200);
        let token: TokenResponse = login.json();
        assert_eq!(token.token_type, "bearer");

        let me = server
            .get("/api/v1/auth/me")
            .authorization_bearer(&token.access_token)
            .await;
        assert_eq!(me.status_code(), 200);
        let me: CurrentUser = me.json();
        assert_eq!(me.username, "admin");
        assert_eq!(me.role, Role::Admin);
    }

    async fn register_client(server: &axum_test::TestServer, token: &str) -> uuid::Uuid {
        let response = server
            .post("/api/v1/clients")
            .authorization_bearer(token)
            .json(&serde_json::json!({
                "full_name": "Grace Hopper",
                "email": format!("{}@example.com", uuid::Uuid::new_v4().simple())
            }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json::<serde_json::Value>()["id"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap()
    }

    /// A booking naming a room that does not exist (or is inactive) fails
    /// as a whole: no reservation row, no line items.
    #[sqlx::test]
    #[test_log::test]
    async fn test_booking_bad_room_leaves_nothing_behind(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);
        let client_id = register_client(&server, &token).await;

        let room_type = create_room_type(&pool).await;
        let room = create_room(&pool, room_type.id, "201", Decimal::new(120, 0)).await;

        let unknown_room = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-10-01",
                "end_date": "2026-10-03",
                "room_ids": [room.id, uuid::Uuid::new_v4()]
            }))
            .await;
        assert_eq!(unknown_room.status_code(), 404);

        let retired = server
            .patch(&format!("/api/v1/rooms/{}", room.id))
            .authorization_bearer(&token)
            .json(&serde_json::json!({"status": "inactive"}))
            .await;
        assert_eq!(retired.status_code(), 200);

        let inactive_room = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-10-01",
                "end_date": "2026-10-03",
                "room_ids": [room.id]
            }))
            .await;
        assert_eq!(inactive_room.status_code(), 404);

        let reservations = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(reservations, 0);
        let line_items = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservation_line_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(line_items, 0);
    }

    /// Cancelling frees the rooms for new bookings; cancelling again is
    /// rejected without touching the reservation.
    #[sqlx::test]
    #[test_log::test]
    async fn test_cancel_frees_rooms_and_is_not_repeatable(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);
        let client_id = register_client(&server, &token).await;

        let room_type = create_room_type(&pool).await;
        let room = create_room(&pool, room_type.id, "301", Decimal::new(90, 0)).await;

        let booking = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-11-10",
                "end_date": "2026-11-12",
                "room_ids": [room.id]
            }))
            .await;
        assert_eq!(booking.status_code(), 201);
        let booking: BookingResponse = booking.json();

        let available = server
            .get("/api/v1/rooms/available")
            .authorization_bearer(&token)
            .add_query_param("start", "2026-11-10")
            .add_query_param("end", "2026-11-12")
            .await;
        assert!(available.json::<Vec<RoomResponse>>().is_empty());

        let cancelled = server
            .post(&format!("/api/v1/reservations/{}/cancel", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(cancelled.status_code(), 200);
        assert_eq!(cancelled.json::<ReservationResponse>().status, ReservationStatus::Cancelled);

        let available = server
            .get("/api/v1/rooms/available")
            .authorization_bearer(&token)
            .add_query_param("start", "2026-11-10")
            .add_query_param("end", "2026-11-12")
            .await;
        let rooms: Vec<RoomResponse> = available.json();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, room.id);

        let again = server
            .post(&format!("/api/v1/reservations/{}/cancel", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(again.status_code(), 409);

        let reservation = server
            .get(&format!("/api/v1/reservations/{}", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        let reservation: ReservationResponse = reservation.json();
        assert_eq!(reservation.status, ReservationStatus::Cancelled);
        assert_eq!(reservation.total, Decimal::new(90, 0));
    }

    /// Replacing the room set of a planned reservation re-snapshots prices
    /// and recomputes the total.
    #[sqlx::test]
    #[test_log::test]
    async fn test_room_swap_recomputes_total(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);
        let client_id = register_client(&server, &token).await;

        let room_type = create_room_type(&pool).await;
        let room_401 = create_room(&pool, room_type.id, "401", Decimal::new(120, 0)).await;
        let room_402 = create_room(&pool, room_type.id, "402", Decimal::new(180, 0)).await;

        let booking = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2026-12-01",
                "end_date": "2026-12-05",
                "room_ids": [room_401.id, room_402.id]
            }))
            .await;
        assert_eq!(booking.status_code(), 201);
        let booking: BookingResponse = booking.json();
        assert_eq!(booking.total, Decimal::new(300, 0));

        let swapped = server
            .put(&format!("/api/v1/reservations/{}/rooms", booking.reservation_id))
            .authorization_bearer(&token)
            .json(&serde_json::json!({"room_ids": [room_402.id]}))
            .await;
        assert_eq!(swapped.status_code(), 200);
        let reservation: ReservationResponse = swapped.json();
        assert_eq!(reservation.total, Decimal::new(180, 0));
        assert_eq!(reservation.rooms.len(), 1);
        assert_eq!(reservation.rooms[0].room_id, room_402.id);
    }

    /// Raising a room's rate after booking must not touch existing
    /// reservations; the line items keep the price they were booked at.
    #[sqlx::test]
    #[test_log::test]
    async fn test_price_change_does_not_alter_existing_booking(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);
        let client_id = register_client(&server, &token).await;

        let room_type = create_room_type(&pool).await;
        let room = create_room(&pool, room_type.id, "501", Decimal::new(120, 0)).await;

        let booking = server
            .post("/api/v1/reservations")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "client_id": client_id,
                "start_date": "2027-01-10",
                "end_date": "2027-01-12",
                "room_ids": [room.id]
            }))
            .await;
        assert_eq!(booking.status_code(), 201);
        let booking: BookingResponse = booking.json();

        let repriced = server
            .patch(&format!("/api/v1/rooms/{}", room.id))
            .authorization_bearer(&token)
            .json(&serde_json::json!({"price": 999}))
            .await;
        assert_eq!(repriced.status_code(), 200);
        assert_eq!(repriced.json::<RoomResponse>().price, Decimal::new(999, 0));

        let reservation = server
            .get(&format!("/api/v1/reservations/{}", booking.reservation_id))
            .authorization_bearer(&token)
            .await;
        let reservation: ReservationResponse = reservation.json();
        assert_eq!(reservation.total, Decimal::new(120, 0));
        assert_eq!(reservation.rooms[0].price, Decimal::new(120, 0));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_room_creation_requires_existing_type(pool: PgPool) {
        let server = create_test_app(pool.clone());
        let staff = create_test_user(&pool, Role::Staff).await;
        let token = auth_token(&staff);

        let response = server
            .post("/api/v1/rooms")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "number": "601",
                "room_type_id": uuid::Uuid::new_v4(),
                "price": 100
            }))
            .await;
        assert_eq!(response.status_code(), 404);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_admin_seeding_is_idempotent(pool: PgPool) {
        let first = create_initial_admin_user("admin", "admin@test.com", Some("pw-number-one"), &pool)
            .await
            .expect("First seeding failed");
        let second = create_initial_admin_user("admin", "admin@test.com", Some("pw-number-two"), &pool)
            .await
            .expect("Second seeding failed");

        assert_eq!(first, second);
    }
}
