use domain_users::{UserService, UserStore};

use crate::config::Config;

/// Shared state handed to the app's own routes.
pub struct AppState<S: UserStore> {
    pub config: Config,
    pub users: UserService<S>,
}

impl<S: UserStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            users: self.users.clone(),
        }
    }
}
