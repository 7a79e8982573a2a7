use crate::utils::AuthError;
use bcrypt::{hash, verify};

/// Hashes with a fresh random salt; bcrypt work runs off the async executor.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash, using the salt embedded in it.
pub async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();

    tokio::task::spawn_blocking(move || verify(password, &stored_hash))
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| AuthError::Internal(format!("Password verification error: {}", e)))
}
