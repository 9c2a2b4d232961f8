//! # Axum Helpers
//!
//! Shared HTTP plumbing for the account services.
//!
//! - **[`envelope`]**: the `{error, data, success}` response body
//! - **[`errors`]**: error codes and the [`AppError`] pipeline
//! - **[`extractors`]**: JSON and query extractors whose rejections are enveloped
//! - **[`http`]**: CORS and security header middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use envelope::{Envelope, failure_response};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{
    cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, parse_origins,
    security_headers,
};

pub use errors::{AppError, ErrorCode, error_response};

pub use extractors::{EnvelopeJson, EnvelopeQuery};
