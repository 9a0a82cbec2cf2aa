use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every error body has the shape `{"detail": "..."}`. Internal failures are
/// logged here and never echoed to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Report not found".to_string())
            }
            AppError::Database(DbError::Conflict(_)) => (
                StatusCode::BAD_REQUEST,
                "Agency with this name already exists".to_string(),
            ),
            AppError::Database(DbError::InvalidReference(agency_id)) => (
                StatusCode::BAD_REQUEST,
                format!("Agency with id {agency_id} does not exist"),
            ),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
            AppError::InvalidPath(rejection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
            }
        };

        let body = Json(json!({ "detail": detail }));
        (status, body).into_response()
    }
}
