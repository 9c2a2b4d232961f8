use axum::response::{IntoResponse, Response};

use super::AppError;

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    AppError::NotFound.into_response()
}

/// Fallback for a matched path with an unsupported method.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
