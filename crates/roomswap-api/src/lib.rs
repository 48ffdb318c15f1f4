pub mod auth;
pub mod error;
pub mod extract;
pub mod hostels;
pub mod matching;
pub mod messages;
pub mod middleware;
pub mod password;
pub mod sessions;
pub mod students;
pub mod swaps;


use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Build the full API router. Transport layers (CORS, tracing) are added by
/// the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/hostels", get(hostels::list_hostels))
        .route("/api/hostels/{id}", get(hostels::get_hostel))
        .route("/api/rooms", get(hostels::list_rooms))
        .route("/api/rooms/{id}", get(hostels::get_room));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/students/me",
            get(students::get_profile).put(students::update_profile),
        )
        .route(
            "/api/swap-requests",
            get(swaps::list_swap_requests).post(swaps::create_swap_request),
        )
        .route("/api/swap-requests/{id}", put(swaps::update_swap_request))
        .route("/api/available-swaps", get(swaps::available_swaps))
        .route(
            "/api/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/api/messages/{id}/read", put(messages::mark_read))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
