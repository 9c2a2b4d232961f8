use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewUser, UniqueField, User, UserFilter};

/// Why a store operation failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The write would duplicate a value on one or more unique fields.
    #[error("Unique constraint violated on {}", join_fields(.0))]
    Conflict(BTreeSet<UniqueField>),

    /// The document breaks a document rule (required field, email format).
    #[error("User rejected: {0}")]
    Rejected(String),

    /// The backend failed or could not be reached.
    #[error("Store backend error: {0}")]
    Backend(String),
}

fn join_fields(fields: &BTreeSet<UniqueField>) -> String {
    fields
        .iter()
        .map(UniqueField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store for users.
///
/// Writes enforce uniqueness of `email` and `username` and the document
/// rules declared on [`User`]. Neither write ever sees a plaintext password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, filter: UserFilter) -> StoreResult<Option<User>>;

    /// Store a new user under a freshly assigned id.
    async fn insert(&self, new_user: NewUser) -> StoreResult<User>;

    /// Replace the stored document with the same id.
    async fn save(&self, user: User) -> StoreResult<User>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}

pub(crate) fn check_rules<T: Validate>(document: &T) -> StoreResult<()> {
    document
        .validate()
        .map_err(|e| StoreError::Rejected(e.to_string()))
}

/// `RwLock<HashMap>` store. Uniqueness is checked under the write lock, so
/// concurrent writers of the same email or username cannot both succeed.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflicts(
        users: &HashMap<Uuid, User>,
        id: Option<Uuid>,
        email: &str,
        username: &str,
    ) -> BTreeSet<UniqueField> {
        let mut fields = BTreeSet::new();
        for other in users.values().filter(|u| Some(u.id) != id) {
            if other.email == email {
                fields.insert(UniqueField::Email);
            }
            if other.username == username {
                fields.insert(UniqueField::Username);
            }
        }
        fields
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_one(&self, filter: UserFilter) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| filter.matches(u)).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<User> {
        check_rules(&new_user)?;

        let mut users = self.users.write().await;
        let conflicts = Self::conflicts(&users, None, &new_user.email, &new_user.username);
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict(conflicts));
        }

        let user = new_user.into_user(Uuid::now_v7());
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn save(&self, user: User) -> StoreResult<User> {
        check_rules(&user)?;

        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::Rejected(format!("No user with id {}", user.id)));
        }

        let conflicts = Self::conflicts(&users, Some(user.id), &user.email, &user.username);
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict(conflicts));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Saved user");
        Ok(user)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            password: "$argon2id$digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_is_findable() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("a@example.com", "a")).await.unwrap();

        let by_email = store
            .find_one(UserFilter::Email("a@example.com".into()))
            .await
            .unwrap();
        let by_id = store.find_one(UserFilter::Id(user.id)).await.unwrap();

        assert_eq!(by_email.as_ref(), Some(&user));
        assert_eq!(by_id, Some(user));
    }

    #[tokio::test]
    async fn test_insert_reports_every_conflicting_field() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("a@example.com", "a")).await.unwrap();

        let err = store
            .insert(new_user("a@example.com", "a"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::Conflict([UniqueField::Email, UniqueField::Username].into())
        );
    }

    #[tokio::test]
    async fn test_rejected_insert_persists_nothing() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("a@example.com", "a")).await.unwrap();
        let _ = store.insert(new_user("a@example.com", "b")).await;

        let found = store
            .find_one(UserFilter::Username("b".into()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_applies_document_rules() {
        let store = InMemoryUserStore::new();

        let err = store.insert(new_user("not-an-email", "a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));

        let mut missing_password = new_user("a@example.com", "a");
        missing_password.password.clear();
        let err = store.insert(missing_password).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_save_ignores_own_values_but_not_others() {
        let store = InMemoryUserStore::new();
        let mut alice = store.insert(new_user("alice@example.com", "alice")).await.unwrap();
        store.insert(new_user("bob@example.com", "bob")).await.unwrap();

        alice.first_name = "Alicia".into();
        let saved = store.save(alice.clone()).await.unwrap();
        assert_eq!(saved.first_name, "Alicia");

        alice.email = "bob@example.com".into();
        let err = store.save(alice).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict([UniqueField::Email].into()));
    }

    #[tokio::test]
    async fn test_save_requires_existing_document() {
        let store = InMemoryUserStore::new();
        let ghost = new_user("ghost@example.com", "ghost").into_user(Uuid::now_v7());

        let err = store.save(ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_inserts_admit_one() {
        let store = InMemoryUserStore::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(new_user("race@example.com", &format!("racer{i}")))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[test]
    fn test_conflict_message_lists_fields() {
        let err = StoreError::Conflict([UniqueField::Username, UniqueField::Email].into());
        assert_eq!(err.to_string(), "Unique constraint violated on email, username");
    }
}
