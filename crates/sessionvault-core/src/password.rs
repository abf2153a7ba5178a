use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AuthError;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AuthError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    verify(password, hash)
        .map_err(|e| AuthError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}
