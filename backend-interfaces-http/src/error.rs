use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    Internal(String),
}

impl From<backend_application::AppError> for HttpError {
    fn from(value: backend_application::AppError) -> Self {
        match value {
            backend_application::AppError::Unauthorized => HttpError::Unauthorized,
            backend_application::AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            backend_application::AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: String,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (code, status, message) = match self {
            HttpError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "unauthorized".to_string(),
            ),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad request", msg),
            HttpError::Internal(msg) => {
                // Internals stay out of the response body.
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error",
                    "internal error".to_string(),
                )
            }
        };
        (
            code,
            Json(ErrorBody {
                status: status.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
