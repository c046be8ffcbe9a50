use super::auth::current_user_id;
use crate::{
    dtos::course::{CourseDetailsResponse, CourseQueryParams, CourseResponse},
    error::AppError,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use models::course_filter::CourseFilter;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// List courses matching the given filters, newest first
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "List of courses retrieved successfully", body = Vec<CourseResponse>),
        (status = 400, description = "Invalid query parameters", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let filter = CourseFilter::try_from(params)?;
    let courses = state.courses(None).filter(&filter).await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Get a course with its teacher, lessons and review statistics
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailsResponse),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetailsResponse>, AppError> {
    let details = state
        .courses(None)
        .find_by_id_with_relations(id, true)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Undefined course with id {id}")))?;

    Ok(Json(details.into()))
}

/// Get a course annotated with whether the authenticated user takes part in it and favorited it
#[utoipa::path(
    get,
    path = "/me/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailsResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn get_my_course_by_id(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetailsResponse>, AppError> {
    let user_id = current_user_id(&claims)?;
    let details = state
        .courses(Some(user_id))
        .find_by_id_with_relations(id, true)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Undefined course with id {id}")))?;

    Ok(Json(details.into()))
}
