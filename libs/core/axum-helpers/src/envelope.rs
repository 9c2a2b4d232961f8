//! The `{error, data, success}` wrapper every response body uses.
//!
//! Success, direct failures and error-pipeline failures all build their body
//! through [`Envelope::new`], so the shape cannot drift between handlers.
//!
//! ```rust
//! use axum::http::StatusCode;
//! use axum_helpers::Envelope;
//!
//! let ok = Envelope::success(42).into_response_with(StatusCode::OK);
//! let missing = Envelope::<()>::failure("User not found").into_response_with(StatusCode::NOT_FOUND);
//! # let _ = (ok, missing);
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Uniform response body. `error` and `data` serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error: Option<String>,
    pub data: Option<T>,
    pub success: bool,
}

impl<T> Envelope<T> {
    pub fn new(error: Option<String>, data: Option<T>, success: bool) -> Self {
        Self {
            error,
            data,
            success,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(None, Some(data), true)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(Some(message.into()), None, false)
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Shorthand for a failed envelope with no data.
pub fn failure_response(status: StatusCode, message: impl Into<String>) -> Response {
    Envelope::<()>::failure(message).into_response_with(status)
}
