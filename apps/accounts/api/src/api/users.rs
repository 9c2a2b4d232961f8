use axum::Router;
use domain_users::{UserEndpoint, UserStore};

use crate::state::AppState;

pub fn router<S: UserStore + 'static>(state: &AppState<S>) -> Router {
    UserEndpoint::new(state.users.clone()).register(Router::new(), &state.config.users.base_path)
}
