//! Error codes shared by every crate that renders HTTP errors.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier, an integer used in
//! structured logs (`error_code = ...`), and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::DuplicateEmail;
//! assert_eq!(code.as_str(), "DUPLICATE_EMAIL");
//! assert_eq!(code.code(), 1102);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors (1000s)
    /// Request validation failed
    ValidationError,

    /// Request body is not valid JSON for the target type
    JsonExtraction,

    /// Requested route or resource does not exist
    NotFound,

    /// Route exists but not for this method
    MethodNotAllowed,

    // Account errors (1100s)
    /// Another user already holds the username
    DuplicateUsername,

    /// Another user already holds the email
    DuplicateEmail,

    /// No user matches the identifier or email
    UserNotFound,

    // Server errors (5000s)
    /// An unexpected internal server error occurred
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::DuplicateUsername => "DUPLICATE_USERNAME",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Integer code for logs and metrics.
    ///
    /// - 1000-1099: request errors
    /// - 1100-1199: account errors
    /// - 5000-5099: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::MethodNotAllowed => 1005,
            Self::DuplicateUsername => 1101,
            Self::DuplicateEmail => 1102,
            Self::UserNotFound => 1103,
            Self::InternalError => 5001,
        }
    }

    /// Default client-facing message; handlers may substitute a more specific one.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "The requested resource was not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::DuplicateUsername => "Username already exists",
            Self::DuplicateEmail => "Email already in use",
            Self::UserNotFound => "User not found",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::UserNotFound.as_str(), "USER_NOT_FOUND");
        assert_eq!(ErrorCode::DuplicateUsername.to_string(), "DUPLICATE_USERNAME");
    }

    #[test]
    fn test_account_codes_share_a_range() {
        for code in [
            ErrorCode::DuplicateUsername,
            ErrorCode::DuplicateEmail,
            ErrorCode::UserNotFound,
        ] {
            assert!((1100..1200).contains(&code.code()), "{code} out of range");
        }
    }

    #[test]
    fn test_error_code_messages() {
        assert_eq!(ErrorCode::UserNotFound.default_message(), "User not found");
        assert_eq!(ErrorCode::DuplicateEmail.default_message(), "Email already in use");
    }

    #[test]
    fn test_error_code_serde_matches_as_str() {
        let json = serde_json::to_string(&ErrorCode::DuplicateEmail).unwrap();
        assert_eq!(json, "\"DUPLICATE_EMAIL\"");

        let code: ErrorCode = serde_json::from_str("\"USER_NOT_FOUND\"").unwrap();
        assert_eq!(code, ErrorCode::UserNotFound);
    }
}
