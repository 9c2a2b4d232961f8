use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, EditUser, NewUser, UserFilter, UserView};
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::store::{StoreError, UserStore};

/// Create, edit and lookup on top of a [`UserStore`].
pub struct UserService<S: UserStore, H: PasswordHasher = Argon2Hasher> {
    store: Arc<S>,
    hasher: Arc<H>,
}

impl<S: UserStore, H: PasswordHasher> Clone for UserService<S, H> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self::with_hasher(store, Argon2Hasher)
    }
}

impl<S: UserStore, H: PasswordHasher> UserService<S, H> {
    pub fn with_hasher(store: S, hasher: H) -> Self {
        Self {
            store: Arc::new(store),
            hasher: Arc::new(hasher),
        }
    }

    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserView> {
        // The digest is never empty, so the plaintext is checked here.
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let password = self.hash_password(input.password).await?;

        let new_user = NewUser {
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password,
        };

        let user = self.store.insert(new_user).await.map_err(classify)?;
        Ok(user.into())
    }

    /// Merge the present fields of `input` into the user named by `user_id`.
    ///
    /// A `user_id` that is not a UUID cannot name a stored user and yields
    /// [`UserError::NotFound`] without touching the store.
    pub async fn edit_user(&self, user_id: &str, input: EditUser) -> UserResult<UserView> {
        let id = Uuid::parse_str(user_id).map_err(|_| UserError::NotFound)?;

        let mut user = self
            .store
            .find_one(UserFilter::Id(id))
            .await
            .map_err(classify)?
            .ok_or(UserError::NotFound)?;

        let digest = match input.new_password() {
            Some(plaintext) => Some(self.hash_password(plaintext.to_string()).await?),
            None => None,
        };
        user.apply_edit(input, digest);

        let saved = self.store.save(user).await.map_err(classify)?;
        Ok(saved.into())
    }

    /// `None` when no user has this email.
    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<UserView>> {
        let user = self
            .store
            .find_one(UserFilter::Email(email.to_string()))
            .await
            .map_err(classify)?;
        Ok(user.map(UserView::from))
    }

    pub async fn health_check(&self) -> UserResult<()> {
        self.store.health_check().await.map_err(classify)
    }

    async fn hash_password(&self, plaintext: String) -> UserResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
    }
}

fn classify(err: StoreError) -> UserError {
    let classified = UserError::from(err);
    match &classified {
        UserError::Internal(details) => tracing::warn!("User store failure: {}", details),
        other => tracing::info!("User write refused: {}", other),
    }
    classified
}
