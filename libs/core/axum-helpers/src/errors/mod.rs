pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::failure_response;

/// HTTP plumbing errors that are not owned by a domain crate.
///
/// Rendered through the response envelope like every other error, with the
/// matching [`ErrorCode`] attached to the log event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl AppError {
    fn parts(self) -> (StatusCode, String, ErrorCode) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                (e.status(), e.body_text(), ErrorCode::JsonExtraction)
            }
            AppError::QueryExtractorRejection(e) => {
                (e.status(), e.body_text(), ErrorCode::ValidationError)
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound.default_message().to_string(),
                ErrorCode::NotFound,
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorCode::MethodNotAllowed.default_message().to_string(),
                ErrorCode::MethodNotAllowed,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = self.parts();
        tracing::info!(error_code = code.code(), %status, "{}", message);
        error_response(status, message, code)
    }
}

/// Build an enveloped error response.
///
/// `error_code` only tags the log event; the body carries just the message.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    tracing::debug!(error_code = error_code.code(), "Rendering error response");
    failure_response(status, message)
}
