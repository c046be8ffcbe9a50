use super::auth::current_user_id;
use crate::{
    dtos::course::CourseDetailsResponse, error::AppError, state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Courses the authenticated user marked as favorite
#[utoipa::path(
    get,
    path = "/me/favorites",
    responses(
        (status = 200, description = "Favorite courses", body = Vec<CourseDetailsResponse>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Favorites"
)]
pub async fn get_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<Json<Vec<CourseDetailsResponse>>, AppError> {
    let user_id = current_user_id(&claims)?;
    let courses = state.courses(Some(user_id));

    let favorites = courses.find_user_favorite_courses(user_id).await?;
    let details = courses.fetch_relations(favorites).await?;

    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// Add a course to the authenticated user's favorites
#[utoipa::path(
    put,
    path = "/courses/{id}/favorite",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course is a favorite"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user_id = current_user_id(&claims)?;
    let courses = state.courses(Some(user_id));

    courses.find_by_id(id, true).await?;
    courses.add_user_favorite_course(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a course from the authenticated user's favorites
#[utoipa::path(
    delete,
    path = "/courses/{id}/favorite",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course is not a favorite"),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user_id = current_user_id(&claims)?;
    state
        .courses(Some(user_id))
        .remove_user_favorite_course(user_id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
