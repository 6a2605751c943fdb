//! Argon2id password hashing keyed with the application secret
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`). The secret is mixed in as
//! the Argon2 key, so a leaked `users` table is useless without
//! `SECRET_KEY`.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};
use once_cell::sync::OnceCell;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("argon2: {0}")]
    Argon2(argon2::Error),

    #[error("password hash: {0}")]
    Phc(argon2::password_hash::Error),
}

impl From<argon2::Error> for HashError {
    fn from(e: argon2::Error) -> Self {
        Self::Argon2(e)
    }
}

impl From<argon2::password_hash::Error> for HashError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::Phc(e)
    }
}

struct Inner {
    secret: Vec<u8>,
    params: Params,
    /// Verified against when the username is unknown, so both failure
    /// paths cost one Argon2 run.
    dummy: OnceCell<String>,
}

/// Cheap to clone; hashing is CPU bound, callers move clones into
/// `spawn_blocking`.
#[derive(Clone)]
pub struct PasswordHasher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", &self.inner.params)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Hasher with the argon2 crate's default cost.
    pub fn new(secret: &str) -> Self {
        Self::with_params(secret, Params::default())
    }

    pub fn with_params(secret: &str, params: Params) -> Self {
        Self {
            inner: Arc::new(Inner {
                secret: secret.as_bytes().to_vec(),
                params,
                dummy: OnceCell::new(),
            }),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, HashError> {
        Ok(Argon2::new_with_secret(
            &self.inner.secret,
            Algorithm::Argon2id,
            Version::V0x13,
            self.inner.params.clone(),
        )?)
    }

    /// Hash with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    /// `Ok(false)` on mismatch. A stored hash that does not parse is
    /// reported as a mismatch and logged.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, HashError> {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return Ok(false);
            }
        };
        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Burn one verification for an unknown user. Always false.
    pub fn verify_dummy(&self, password: &str) -> Result<bool, HashError> {
        let dummy = self
            .inner
            .dummy
            .get_or_try_init(|| self.hash("travelhub-dummy-password"))?;
        self.verify(password, dummy)?;
        Ok(false)
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    let params = Params::new(8, 1, 1, None).expect("test params");
    PasswordHasher::with_params("test-secret", params)
}
