//! bcrypt hashing shared by the store implementations.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool.

use crate::database::StoreError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, StoreError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| StoreError::Backend(format!("hashing task failed: {}", e)))?
            .map_err(StoreError::from)
    }

    /// A malformed stored hash counts as a mismatch
    pub async fn verify(&self, candidate: &str, hash: &str) -> Result<bool, StoreError> {
        let candidate = candidate.to_owned();
        let hash = hash.to_owned();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash).unwrap_or(false))
            .await
            .map_err(|e| StoreError::Backend(format!("verify task failed: {}", e)))?;
        Ok(matched)
    }
}
