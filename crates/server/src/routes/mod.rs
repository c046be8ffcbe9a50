use crate::state::AppState;
use utoipa_axum::{router::OpenApiRouter, routes};

pub mod auth;
pub mod course;
pub mod favorite;
pub mod health;
pub mod ticket;

/// Routes open to anonymous clients
pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::health))
        .routes(routes!(course::get_courses))
        .routes(routes!(course::get_course_by_id))
        .routes(routes!(auth::confirm_registration))
}

/// Routes that need a valid JWT
pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(course::get_my_course_by_id))
        .routes(routes!(favorite::get_favorites))
        .routes(routes!(favorite::add_favorite, favorite::remove_favorite))
        .routes(routes!(ticket::purchase_ticket))
        .routes(routes!(ticket::cancel_ticket))
}
