use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use axum_helpers::{Envelope, EnvelopeJson, EnvelopeQuery, failure_response};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, EditUser, EmailQuery};
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::service::UserService;
use crate::store::UserStore;

const USER_NOT_FOUND: &str = "User not found";

/// HTTP surface of the users domain.
///
/// Building an endpoint registers nothing. Call [`UserEndpoint::register`]
/// to mount its routes:
///
/// | Method | Path                   |
/// |--------|------------------------|
/// | POST   | `{base}/new`           |
/// | POST   | `{base}/edit/{userId}` |
/// | GET    | `{base}?email=...`     |
pub struct UserEndpoint<S: UserStore, H: PasswordHasher = Argon2Hasher> {
    service: Arc<UserService<S, H>>,
}

impl<S, H> UserEndpoint<S, H>
where
    S: UserStore + 'static,
    H: PasswordHasher,
{
    pub fn new(service: UserService<S, H>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Mount the user routes on `router` under `base_path`.
    ///
    /// `base_path` gets a leading `/` and loses any trailing `/`; an empty
    /// path mounts at the root.
    pub fn register<T>(self, router: Router<T>, base_path: &str) -> Router<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let base = normalize_base_path(base_path);
        let lookup_path = if base.is_empty() { "/" } else { base.as_str() };

        tracing::info!(base_path = %lookup_path, "Registering user routes");

        let routes: Router<T> = Router::new()
            .route(&format!("{base}/new"), post(create_user::<S, H>))
            .route(&format!("{base}/edit/{{userId}}"), post(edit_user::<S, H>))
            .route(lookup_path, get(find_by_email::<S, H>))
            .with_state(self.service);

        router.merge(routes)
    }
}

pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// POST {base}/new
async fn create_user<S: UserStore, H: PasswordHasher>(
    State(service): State<Arc<UserService<S, H>>>,
    EnvelopeJson(input): EnvelopeJson<CreateUser>,
) -> UserResult<Response> {
    let user = service.create_user(input).await?;
    Ok(Envelope::success(user).into_response_with(StatusCode::CREATED))
}

/// POST {base}/edit/{userId}
async fn edit_user<S: UserStore, H: PasswordHasher>(
    State(service): State<Arc<UserService<S, H>>>,
    Path(user_id): Path<String>,
    EnvelopeJson(input): EnvelopeJson<EditUser>,
) -> UserResult<Response> {
    let user = service.edit_user(&user_id, input).await?;
    Ok(Envelope::success(user).into_response_with(StatusCode::OK))
}

/// GET {base}?email=...
///
/// A miss is answered here with a 404 envelope rather than through
/// [`UserError`].
async fn find_by_email<S: UserStore, H: PasswordHasher>(
    State(service): State<Arc<UserService<S, H>>>,
    EnvelopeQuery(query): EnvelopeQuery<EmailQuery>,
) -> UserResult<Response> {
    let email = query
        .email
        .ok_or_else(|| UserError::Validation("email query parameter is required".to_string()))?;

    let response = match service.find_by_email(&email).await? {
        Some(user) => Envelope::success(user).into_response_with(StatusCode::OK),
        None => failure_response(StatusCode::NOT_FOUND, USER_NOT_FOUND),
    };
    Ok(response)
}
