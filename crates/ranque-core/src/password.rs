//! Password hashing backed by bcrypt.
//!
//! Stores hand the hash produced here to persistence and call
//! [`verify_password`] as their credential verification primitive.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` on mismatch. An `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hashed = hash_password("Str0ng!pass").unwrap();
        assert_ne!(hashed, "Str0ng!pass");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn test_verify_round_trip() {
        let hashed = hash_password("Str0ng!pass").unwrap();
        assert!(verify_password("Str0ng!pass", &hashed).unwrap());
        assert!(!verify_password("str0ng!pass", &hashed).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "plaintext-in-the-db").is_err());
    }
}
