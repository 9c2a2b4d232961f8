//! Users Domain
//!
//! Create, edit and lookup of user accounts over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ UserEndpoint │  ← routes, envelope responses
//! └──────┬───────┘
//!        │
//! ┌──────▼──────┐
//! │ UserService │  ← password hashing, edit merge, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  UserStore  │  ← uniqueness + document rules (in-memory or MongoDB)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← records, payloads, public view
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use domain_users::{InMemoryUserStore, UserEndpoint, UserService};
//!
//! let service = UserService::new(InMemoryUserStore::new());
//! let router: Router = UserEndpoint::new(service).register(Router::new(), "/users");
//! ```

pub mod error;
pub mod handlers;
pub mod models;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod password;
pub mod service;
pub mod store;

pub use error::{UserError, UserResult};
pub use handlers::UserEndpoint;
pub use models::{CreateUser, EditUser, EmailQuery, NewUser, UniqueField, User, UserFilter, UserView};
#[cfg(feature = "mongodb")]
pub use mongo::MongoUserStore;
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::UserService;
pub use store::{InMemoryUserStore, StoreError, StoreResult, UserStore};
