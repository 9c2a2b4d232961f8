use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stored user record.
///
/// `password` always holds a PHC digest once persisted and is never
/// serialized. Responses go through [`UserView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[validate(length(min = 1, message = "email is required"), email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// A user that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "email is required"), email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password,
        }
    }
}

/// Body of `POST {base}/new`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Plaintext; hashed before it reaches the store
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Body of `POST {base}/edit/{userId}`. Absent or `null` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// An empty string leaves the password unchanged
    #[serde(default)]
    pub password: Option<String>,
}

impl EditUser {
    /// The new plaintext password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl User {
    /// Merge the present fields of `edit`. The password is handled separately
    /// since it must be hashed first.
    pub fn apply_edit(&mut self, edit: EditUser, password_digest: Option<String>) {
        if let Some(email) = edit.email {
            self.email = email;
        }
        if let Some(username) = edit.username {
            self.username = username;
        }
        if let Some(first_name) = edit.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = edit.last_name {
            self.last_name = last_name;
        }
        if let Some(digest) = password_digest {
            self.password = digest;
        }
    }
}

/// Public projection of a [`User`]; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Query of `GET {base}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Fields the store keeps unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }

    /// Name of the unique index backing this field.
    pub fn index_name(&self) -> &'static str {
        match self {
            Self::Email => "email_1",
            Self::Username => "username_1",
        }
    }

    pub fn from_index_name(name: &str) -> Option<Self> {
        [Self::Email, Self::Username]
            .into_iter()
            .find(|field| field.index_name() == name)
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-field lookup understood by every store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(Uuid),
    Email(String),
    Username(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id == *id,
            Self::Email(email) => user.email == *email,
            Self::Username(username) => user.username == *username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::now_v7(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        }
    }

    #[test]
    fn test_apply_edit_only_touches_present_fields() {
        let mut stored = user();
        let before = stored.clone();

        let edit: EditUser = serde_json::from_str(r#"{"firstName": "X", "lastName": null}"#).unwrap();
        stored.apply_edit(edit, None);

        assert_eq!(stored.first_name, "X");
        assert_eq!(stored.last_name, before.last_name);
        assert_eq!(stored.email, before.email);
        assert_eq!(stored.username, before.username);
        assert_eq!(stored.password, before.password);
    }

    #[test]
    fn test_empty_password_counts_as_absent() {
        let edit = EditUser {
            password: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(edit.new_password(), None);

        let edit = EditUser {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        assert_eq!(edit.new_password(), Some("hunter2"));
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Ada");
    }

    #[test]
    fn test_view_drops_password() {
        let stored = user();
        let view = UserView::from(stored.clone());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(view.id, stored.id);
        assert!(json.get("password").is_none());
        assert_eq!(json["lastName"], "Lovelace");
    }

    #[test]
    fn test_unique_field_index_names() {
        assert_eq!(UniqueField::from_index_name("email_1"), Some(UniqueField::Email));
        assert_eq!(UniqueField::from_index_name("username_1"), Some(UniqueField::Username));
        assert_eq!(UniqueField::from_index_name("_id_"), None);
    }

    #[test]
    fn test_document_rules() {
        let mut invalid = user();
        invalid.email = "not-an-email".into();
        assert!(invalid.validate().is_err());

        let missing = NewUser {
            email: "a@example.com".into(),
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: "digest".into(),
        };
        assert!(missing.validate().is_err());
    }
}
