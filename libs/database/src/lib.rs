//! Database connectors for the accounts service.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, configuration and health checks
//! - `config` - `core_config::FromEnv` support for connector configuration
//! - `all` - everything above
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "accounts");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let users = client.database(config.database()).collection::<Document>("users");
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry, retry_with_backoff};
