use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::RepositoryError;
use log::error;
use sea_orm::DbErr;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body returned by every endpoint on failure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// One of `NOT_FOUND`, `VALIDATION_ERROR`, `CONFLICT`, `UNAUTHORIZED`, `INTERNAL_ERROR`
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    #[schema(example = "Undefined course with id 42")]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Internal(detail) => {
                error!("Internal error: {detail}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".to_owned(),
                    },
                );
            }
        };

        (
            status,
            ErrorBody {
                code,
                message: self.to_string(),
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(message) => AppError::NotFound(message),
            RepositoryError::Conflict(message) => AppError::Conflict(message),
            RepositoryError::Validation(e) => AppError::Validation(e.to_string()),
            // Entity hooks reject invalid values before they reach the database
            RepositoryError::Db(DbErr::Custom(message)) => AppError::Validation(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        RepositoryError::Db(err).into()
    }
}
