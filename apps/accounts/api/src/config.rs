use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Where the user endpoint is mounted, below `/api`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsersConfig {
    pub base_path: String,
}

impl FromEnv for UsersConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_path: env_or_default("USERS_BASE_PATH", "/users"),
        })
    }
}

/// Application configuration composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub users: UsersConfig,
    /// `None` selects the in-memory store
    pub mongo: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let users = UsersConfig::from_env()?;
        let mongo = MongoConfig::from_env_optional()?.map(|mut config| {
            config.app_name.get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());
            config
        });

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            users,
            mongo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_in_memory_store() {
        temp_env::with_vars_unset(
            ["MONGODB_URL", "MONGO_URL", "USERS_BASE_PATH", "HOST", "PORT"],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.mongo.is_none());
                assert_eq!(config.users.base_path, "/users");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.app.name, "accounts_api");
            },
        );
    }

    #[test]
    fn test_mongo_selected_when_url_set() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("accounts")),
                ("MONGODB_APP_NAME", None),
                ("USERS_BASE_PATH", Some("/members")),
            ],
            || {
                let config = Config::from_env().unwrap();
                let mongo = config.mongo.unwrap();
                assert_eq!(mongo.database, "accounts");
                assert_eq!(mongo.app_name.as_deref(), Some("accounts_api"));
                assert_eq!(config.users.base_path, "/members");
            },
        );
    }

    #[test]
    fn test_mongo_url_without_database_fails() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
