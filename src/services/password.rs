// Password hashing on top of bcrypt

use anyhow::{Context, Result};
use bcrypt::BcryptResult;

/// Hashes a plain-text password with the given bcrypt cost
pub fn hash_password(plain: &str, cost: u32) -> BcryptResult<String> {
    bcrypt::hash(plain, cost)
}

/// Compares a plain-text password against a stored bcrypt hash.
/// A mismatch is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(plain: &str, hashed: &str) -> BcryptResult<bool> {
    bcrypt::verify(plain, hashed)
}

/// Async front for the bcrypt functions. Hashing is CPU bound, so the
/// work runs on tokio's blocking pool instead of a reactor thread.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> Result<String> {
        let plain: String = plain.to_owned();
        let cost: u32 = self.cost;

        tokio::task::spawn_blocking(move || hash_password(&plain, cost))
            .await
            .context("Password hashing task failed")?
            .context("Failed to hash password")
    }

    pub async fn verify(&self, plain: &str, hashed: &str) -> Result<bool> {
        let plain: String = plain.to_owned();
        let hashed: String = hashed.to_owned();

        tokio::task::spawn_blocking(move || verify_password(&plain, &hashed))
            .await
            .context("Password verification task failed")?
            .context("Stored password hash is malformed")
    }
}
