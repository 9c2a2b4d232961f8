use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_users::UserStore;

use crate::state::AppState;

/// Readiness: 200 when the user store answers, 503 otherwise.
pub async fn ready_handler<S: UserStore + 'static>(State(state): State<AppState<S>>) -> Response {
    let backend = if state.config.mongo.is_some() {
        "mongodb"
    } else {
        "memory"
    };

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        backend,
        Box::pin(async {
            state
                .users
                .health_check()
                .await
                .map_err(|e| format!("User store check failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}
