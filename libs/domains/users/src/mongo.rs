//! MongoDB-backed [`UserStore`].
//!
//! Users live in the `users` collection with the id as a string `_id`.
//! Uniqueness comes from the `email_1` and `username_1` indexes created by
//! [`MongoUserStore::ensure_indexes`].

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::models::{NewUser, UniqueField, User, UserFilter};
use crate::store::{StoreError, StoreResult, UserStore, check_rules};

const COLLECTION: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    email: String,
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    password: String,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password: user.password.clone(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = StoreError;

    fn try_from(document: UserDocument) -> StoreResult<Self> {
        let id = Uuid::parse_str(&document.id)
            .map_err(|e| StoreError::Backend(format!("Stored _id {} is not a UUID: {}", document.id, e)))?;
        Ok(User {
            id,
            email: document.email,
            username: document.username,
            first_name: document.first_name,
            last_name: document.last_name,
            password: document.password,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MongoUserStore {
    database: Database,
    collection: Collection<UserDocument>,
}

impl MongoUserStore {
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(COLLECTION),
        }
    }

    /// Create the unique indexes on `email` and `username`. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), MongoError> {
        let indexes = [UniqueField::Email, UniqueField::Username].map(|field| {
            let mut keys = Document::new();
            keys.insert(field.as_str(), 1);

            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(field.index_name().to_string())
                        .build(),
                )
                .build()
        });

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = COLLECTION, "Ensured unique user indexes");
        Ok(())
    }

    /// A duplicate-key error names only the first violated index, so the
    /// remaining unique fields are looked up against other documents.
    async fn complete_conflict(&self, err: StoreError, user: &User) -> StoreError {
        let StoreError::Conflict(mut fields) = err else {
            return err;
        };

        for (field, value) in [
            (UniqueField::Email, &user.email),
            (UniqueField::Username, &user.username),
        ] {
            if fields.contains(&field) {
                continue;
            }

            let mut filter = Document::new();
            filter.insert(field.as_str(), value.as_str());
            filter.insert("_id", doc! { "$ne": user.id.to_string() });

            match self.collection.find_one(filter).await {
                Ok(Some(_)) => {
                    fields.insert(field);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(field = field.as_str(), error = %e, "Could not check for a second duplicate");
                }
            }
        }

        StoreError::Conflict(fields)
    }
}

fn filter_document(filter: &UserFilter) -> Document {
    match filter {
        UserFilter::Id(id) => doc! { "_id": id.to_string() },
        UserFilter::Email(email) => doc! { "email": email },
        UserFilter::Username(username) => doc! { "username": username },
    }
}

/// Unique fields named by a duplicate-key message such as
/// `E11000 duplicate key error collection: db.users index: email_1 dup key: ...`.
fn fields_from_duplicate_message(message: &str) -> BTreeSet<UniqueField> {
    message
        .split("index: ")
        .skip(1)
        .filter_map(|rest| rest.split_whitespace().next())
        .filter_map(UniqueField::from_index_name)
        .collect()
}

fn map_write_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            StoreError::Conflict(fields_from_duplicate_message(&write_error.message))
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_one(&self, filter: UserFilter) -> StoreResult<Option<User>> {
        self.collection
            .find_one(filter_document(&filter))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<User> {
        check_rules(&new_user)?;

        let user = new_user.into_user(Uuid::now_v7());
        if let Err(e) = self.collection.insert_one(UserDocument::from(&user)).await {
            return Err(self.complete_conflict(map_write_error(e), &user).await);
        }

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn save(&self, user: User) -> StoreResult<User> {
        check_rules(&user)?;

        let result = match self
            .collection
            .replace_one(filter_document(&UserFilter::Id(user.id)), UserDocument::from(&user))
            .await
        {
            Ok(result) => result,
            Err(e) => return Err(self.complete_conflict(map_write_error(e), &user).await),
        };

        if result.matched_count == 0 {
            return Err(StoreError::Rejected(format!("No user with id {}", user.id)));
        }

        tracing::info!(user_id = %user.id, "Saved user");
        Ok(user)
    }

    async fn health_check(&self) -> StoreResult<()> {
        if database::mongodb::check_health(&self.database).await {
            Ok(())
        } else {
            Err(StoreError::Backend("MongoDB ping failed".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_email_index() {
        let message = r#"E11000 duplicate key error collection: accounts.users index: email_1 dup key: { email: "a@example.com" }"#;
        assert_eq!(
            fields_from_duplicate_message(message),
            BTreeSet::from([UniqueField::Email])
        );
    }

    #[test]
    fn test_duplicate_message_names_username_index() {
        let message = r#"E11000 duplicate key error collection: accounts.users index: username_1 dup key: { username: "ada" }"#;
        assert_eq!(
            fields_from_duplicate_message(message),
            BTreeSet::from([UniqueField::Username])
        );
    }

    #[test]
    fn test_duplicate_message_with_unknown_index_is_empty() {
        let message = "E11000 duplicate key error collection: accounts.users index: _id_ dup key: { _id: \"x\" }";
        assert!(fields_from_duplicate_message(message).is_empty());
    }

    #[test]
    fn test_document_uses_string_id() {
        let user = User {
            id: Uuid::now_v7(),
            email: "a@example.com".into(),
            username: "a".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            password: "$argon2id$digest".into(),
        };
        let document = mongodb::bson::to_document(&UserDocument::from(&user)).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), user.id.to_string());
        assert_eq!(document.get_str("firstName").unwrap(), "A");
        assert_eq!(document.get_str("password").unwrap(), "$argon2id$digest");

        let back: UserDocument = mongodb::bson::from_document(document).unwrap();
        assert_eq!(User::try_from(back).unwrap(), user);
    }
}
