//! OpenAPI documentation for the management API at `/api/v1/*`.
//!
//! Served interactively at `/docs`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api;

/// Registers the JWT bearer scheme referenced by the path annotations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT bearer token obtained from `POST /api/v1/auth/login` \
                             or the Google sign-in flow.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "hotelctl API",
        description = "Hotel reservation management: staff accounts, guests, rooms, \
                       reservations, payments, services and reports.",
    ),
    servers((url = "/api/v1")),
    paths(
        api::handlers::auth::login,
        api::handlers::auth::google_authorize,
        api::handlers::auth::google_callback,
        api::handlers::auth::me,
        api::handlers::users::create_user,
        api::handlers::users::list_users,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::clients::create_client,
        api::handlers::clients::list_clients,
        api::handlers::clients::get_client,
        api::handlers::clients::update_client,
        api::handlers::clients::delete_client,
        api::handlers::room_types::create_room_type,
        api::handlers::room_types::list_room_types,
        api::handlers::room_types::get_room_type,
        api::handlers::room_types::update_room_type,
        api::handlers::room_types::delete_room_type,
        api::handlers::rooms::create_room,
        api::handlers::rooms::list_rooms,
        api::handlers::rooms::available_rooms,
        api::handlers::rooms::get_room,
        api::handlers::rooms::update_room,
        api::handlers::rooms::delete_room,
        api::handlers::reservations::create_reservation,
        api::handlers::reservations::list_reservations,
        api::handlers::reservations::get_reservation,
        api::handlers::reservations::update_reservation,
        api::handlers::reservations::replace_rooms,
        api::handlers::reservations::cancel_reservation,
        api::handlers::reservations::check_in,
        api::handlers::reservations::check_out,
        api::handlers::payments::create_payment,
        api::handlers::payments::list_payments,
        api::handlers::payments::get_payment,
        api::handlers::services::create_service,
        api::handlers::services::list_services,
        api::handlers::services::get_service,
        api::handlers::services::update_service,
        api::handlers::services::delete_service,
        api::handlers::reports::reservations_by_status,
        api::handlers::reports::revenue,
        api::handlers::reports::popular_rooms,
    ),
    components(schemas(
        api::models::auth::LoginRequest,
        api::models::auth::TokenResponse,
        api::models::users::Role,
        api::models::users::CurrentUser,
        api::models::users::UserCreate,
        api::models::users::UserUpdate,
        api::models::users::UserResponse,
        api::models::clients::ClientCreate,
        api::models::clients::ClientUpdate,
        api::models::clients::ClientResponse,
        api::models::room_types::RoomTypeCreate,
        api::models::room_types::RoomTypeUpdate,
        api::models::room_types::RoomTypeResponse,
        api::models::rooms::RoomStatus,
        api::models::rooms::RoomCreate,
        api::models::rooms::RoomUpdate,
        api::models::rooms::RoomResponse,
        api::models::reservations::ReservationStatus,
        api::models::reservations::ReservationCreate,
        api::models::reservations::ReservationUpdate,
        api::models::reservations::RoomSetUpdate,
        api::models::reservations::LineItemResponse,
        api::models::reservations::ReservationResponse,
        api::models::reservations::BookingResponse,
        api::models::payments::PaymentMethod,
        api::models::payments::PaymentCreate,
        api::models::payments::PaymentResponse,
        api::models::services::ServiceCreate,
        api::models::services::ServiceUpdate,
        api::models::services::ServiceResponse,
        api::models::reports::StatusCountResponse,
        api::models::reports::RevenueResponse,
        api::models::reports::PopularRoomResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and session endpoints"),
        (name = "users", description = "Staff account management (admin only)"),
        (name = "clients", description = "Guest records"),
        (name = "room-types", description = "Room categories and base rates"),
        (name = "rooms", description = "Rooms and availability"),
        (name = "reservations", description = "Bookings and their lifecycle"),
        (name = "payments", description = "Payments against reservations"),
        (name = "services", description = "Extra hotel services"),
        (name = "reports", description = "Operational reports"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builds_with_uuid_fields() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();

        // Id fields are aliased newtypes; they must come out as uuid strings
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let id = &value["components"]["schemas"]["ReservationResponse"]["properties"]["id"];
        assert_eq!(id["type"], "string");
        assert_eq!(id["format"], "uuid");

        assert!(value["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
