use axum::{Router, routing::get};
use domain_users::UserStore;

use crate::state::AppState;

pub mod health;
pub mod users;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes<S: UserStore + 'static>(state: &AppState<S>) -> Router {
    users::router(state)
}

/// `/ready`, probing the user store.
pub fn ready_router<S: UserStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler::<S>))
        .with_state(state)
}
