use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::{UserError, UserResult};

/// One-way salted password hashing.
///
/// Both calls are CPU bound; async callers run them on the blocking pool.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash `plaintext` with a fresh salt into a self-describing digest.
    fn hash(&self, plaintext: &str) -> UserResult<String>;

    /// Check `plaintext` against a digest produced by [`PasswordHasher::hash`].
    fn verify(&self, plaintext: &str, digest: &str) -> UserResult<bool>;
}

/// Argon2id with the crate's default cost parameters, PHC string output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(digest).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(UserError::PasswordHash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hasher = Argon2Hasher::default();
        let digest = hasher.hash("correct horse").unwrap();

        assert_ne!(digest, "correct horse");
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &digest).unwrap());
        assert!(!hasher.verify("battery staple", &digest).unwrap());
    }

    #[test]
    fn test_same_plaintext_gets_distinct_salts() {
        let hasher = Argon2Hasher::default();
        let first = hasher.hash("s3cret").unwrap();
        let second = hasher.hash("s3cret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("s3cret", &first).unwrap());
        assert!(hasher.verify("s3cret", &second).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        let hasher = Argon2Hasher::default();
        assert!(matches!(
            hasher.verify("anything", "plaintext-not-a-phc-string"),
            Err(UserError::PasswordHash(_))
        ));
    }
}
