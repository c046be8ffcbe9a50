use crate::{dtos::user::UserResponse, error::AppError, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use database::repositories::UserRepository;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// The id of the authenticated user, carried in the `sub` claim of their JWT
pub fn current_user_id(claims: &DefaultClaims) -> Result<i64, AppError> {
    claims
        .sub
        .as_deref()
        .and_then(|sub| sub.parse().ok())
        .ok_or(AppError::Unauthorized)
}

/// Activates the account a registration confirmation token was issued for
#[utoipa::path(
    post,
    path = "/register/confirm/{token}",
    params(
        ("token" = String, Path, description = "Registration confirmation token")
    ),
    responses(
        (status = 200, description = "Registration confirmed", body = UserResponse),
        (status = 404, description = "Unknown token", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn confirm_registration(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::new(&state.db)
        .confirm_registration(&token)
        .await?;

    Ok(Json(user.into()))
}
