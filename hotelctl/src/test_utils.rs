//! Shared helpers for tests.

use crate::{
    api::models::users::{CurrentUser, Role, UserResponse},
    auth::session::create_session_token,
    db::{
        handlers::{Repository, RoomTypes, Rooms, Users},
        models::{
            rooms::{RoomCreateDBRequest, RoomDBResponse},
            room_types::{RoomTypeCreateDBRequest, RoomTypeDBResponse},
            users::UserCreateDBRequest,
        },
    },
};
use crate::api::models::rooms::RoomStatus;
use axum_test::TestServer;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub fn create_test_config() -> crate::config::Config {
    crate::config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        admin_email: "admin@test.com".to_string(),
        admin_password: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        ..Default::default()
    }
}

pub fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    crate::Application::new_with_pool(config, pool)
        .expect("Failed to create application")
        .into_test_server()
}

pub async fn create_test_user(pool: &PgPool, role: Role) -> UserResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users_repo = Users::new(&mut conn);
    let username = format!("testuser_{}", Uuid::new_v4().simple());
    let email = format!("{username}@example.com");

    let user_create = UserCreateDBRequest {
        username,
        email,
        role,
        auth_source: "test".to_string(),
        password_hash: None,
    };

    let user = users_repo.create(&user_create).await.expect("Failed to create test user");
    UserResponse::from(user)
}

/// Bearer token for an existing test user, signed with the test secret.
pub fn auth_token(user: &UserResponse) -> String {
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
    };
    create_session_token(&current, &create_test_config()).expect("Failed to create session token")
}

pub async fn create_room_type(pool: &PgPool) -> RoomTypeDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    RoomTypes::new(&mut conn)
        .create(&RoomTypeCreateDBRequest {
            name: format!("type_{}", Uuid::new_v4().simple()),
            description: None,
            capacity: 2,
        })
        .await
        .expect("Failed to create test room type")
}

pub async fn create_room(pool: &PgPool, room_type_id: crate::RoomTypeId, number: &str, price: Decimal) -> RoomDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Rooms::new(&mut conn)
        .create(&RoomCreateDBRequest {
            number: number.to_string(),
            room_type_id,
            price,
            status: RoomStatus::Available,
        })
        .await
        .expect("Failed to create test room")
}
