use super::auth::current_user_id;
use crate::{dtos::ticket::TicketResponse, error::AppError, state::AppState};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::EnrollmentService;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Buy a ticket for a course at its current price
#[utoipa::path(
    post,
    path = "/courses/{id}/tickets",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 201, description = "Ticket paid", body = TicketResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody),
        (status = 409, description = "Course already paid", body = crate::error::ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Tickets"
)]
pub async fn purchase_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<TicketResponse>), AppError> {
    let user_id = current_user_id(&claims)?;
    let ticket = EnrollmentService::purchase(&state.db, id, user_id).await?;

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// Cancel one of the authenticated user's tickets
#[utoipa::path(
    post,
    path = "/tickets/{id}/cancel",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket cancelled", body = TicketResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorBody),
        (status = 409, description = "Ticket already cancelled", body = crate::error::ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Tickets"
)]
pub async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<i64>,
) -> Result<Json<TicketResponse>, AppError> {
    let user_id = current_user_id(&claims)?;
    let ticket = EnrollmentService::cancel(&state.db, id, user_id).await?;

    Ok(Json(ticket.into()))
}
