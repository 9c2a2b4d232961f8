use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, error_response};
use thiserror::Error;

use crate::models::UniqueField;
use crate::store::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User not found")]
    NotFound,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// One store failure becomes exactly one error. Username wins when both
/// unique fields conflict.
impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(fields) if fields.contains(&UniqueField::Username) => {
                UserError::DuplicateUsername
            }
            StoreError::Conflict(fields) if fields.contains(&UniqueField::Email) => {
                UserError::DuplicateEmail
            }
            StoreError::Conflict(_) => {
                UserError::Validation("User violates a uniqueness constraint".to_string())
            }
            StoreError::Rejected(details) => UserError::Validation(details),
            StoreError::Backend(details) => UserError::Internal(details),
        }
    }
}

impl UserError {
    fn code(&self) -> ErrorCode {
        match self {
            UserError::DuplicateUsername => ErrorCode::DuplicateUsername,
            UserError::DuplicateEmail => ErrorCode::DuplicateEmail,
            UserError::Validation(_) => ErrorCode::ValidationError,
            UserError::NotFound => ErrorCode::UserNotFound,
            UserError::PasswordHash(_) | UserError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            UserError::DuplicateUsername | UserError::DuplicateEmail => {
                (StatusCode::CONFLICT, code.default_message().to_string())
            }
            UserError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            UserError::NotFound => (StatusCode::NOT_FOUND, code.default_message().to_string()),
            UserError::PasswordHash(msg) => {
                tracing::error!(error_code = code.code(), "Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code.default_message().to_string(),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!(error_code = code.code(), "Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code.default_message().to_string(),
                )
            }
        };

        error_response(status, message, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::collections::BTreeSet;

    fn conflict(fields: &[UniqueField]) -> StoreError {
        StoreError::Conflict(fields.iter().copied().collect::<BTreeSet<_>>())
    }

    async fn render(err: UserError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_username_conflict_wins_over_email() {
        let err = UserError::from(conflict(&[UniqueField::Email, UniqueField::Username]));
        assert_eq!(err, UserError::DuplicateUsername);
    }

    #[test]
    fn test_single_field_conflicts() {
        assert_eq!(
            UserError::from(conflict(&[UniqueField::Email])),
            UserError::DuplicateEmail
        );
        assert_eq!(
            UserError::from(conflict(&[UniqueField::Username])),
            UserError::DuplicateUsername
        );
    }

    #[test]
    fn test_unclassified_failures() {
        assert!(matches!(UserError::from(conflict(&[])), UserError::Validation(_)));
        assert_eq!(
            UserError::from(StoreError::Rejected("email is invalid".into())),
            UserError::Validation("email is invalid".into())
        );
        assert_eq!(
            UserError::from(StoreError::Backend("connection reset".into())),
            UserError::Internal("connection reset".into())
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (UserError::DuplicateUsername, StatusCode::CONFLICT),
            (UserError::DuplicateEmail, StatusCode::CONFLICT),
            (UserError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (UserError::NotFound, StatusCode::NOT_FOUND),
            (UserError::PasswordHash("oom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (UserError::Internal("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, body) = render(err).await;
            assert_eq!(status, expected);
            assert_eq!(body["success"], false);
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let (_, body) = render(UserError::Internal("mongodb://admin:secret@db".into())).await;
        assert_eq!(
            body,
            json!({"error": "An internal server error occurred", "data": null, "success": false})
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_message() {
        let (_, body) = render(UserError::DuplicateEmail).await;
        assert_eq!(body["error"], "Email already in use");
    }
}
