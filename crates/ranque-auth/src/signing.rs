//! Signing material provider.
//!
//! Turns the process-wide symmetric secret into [`SigningCredentials`].
//! The algorithm is fixed to HMAC-SHA256 for the whole system: tokens are
//! only ever written with it and validation accepts nothing else.
//!
//! Credentials are a pure function of the secret, so every process sharing
//! `RANQUE_SECRET` produces equal credentials and accepts each other's tokens.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use ranque_config::JwtConfig;
use ranque_config::jwt::validate_secret;
use ranque_core::AppError;
use sha2::{Digest, Sha256};

/// The single supported signature algorithm.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Clone)]
pub struct SigningCredentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    key_id: String,
}

impl SigningCredentials {
    /// Derives credentials from `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the secret is empty or shorter
    /// than HMAC-SHA256 requires.
    pub fn from_secret(secret: &str) -> Result<Self, AppError> {
        validate_secret(secret)?;

        let bytes = secret.as_bytes();
        let digest = Sha256::digest(bytes);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            key_id: hex::encode(&digest[..8]),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        SIGNING_ALGORITHM
    }

    /// Short, non-reversible identifier of the key. Equal secrets give equal ids.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl PartialEq for SigningCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id
    }
}

impl Eq for SigningCredentials {}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Resolves signing credentials from configuration.
pub fn signing_credentials(config: &JwtConfig) -> Result<SigningCredentials, AppError> {
    SigningCredentials::from_secret(&config.secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_same_secret_same_credentials() {
        let a = SigningCredentials::from_secret(SECRET).unwrap();
        let b = SigningCredentials::from_secret(SECRET).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key_id(), b.key_id());
    }

    #[test]
    fn test_different_secret_different_credentials() {
        let a = SigningCredentials::from_secret(SECRET).unwrap();
        let b = SigningCredentials::from_secret("another-secret-key-at-least-32-chars-long").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_secret_fails() {
        assert!(matches!(
            SigningCredentials::from_secret(""),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_short_secret_fails() {
        assert!(matches!(
            SigningCredentials::from_secret("only-sixteen-byte"),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_signing_credentials_from_config_rechecks_secret() {
        let mut config = JwtConfig::new(SECRET).unwrap();
        config.secret = String::new();
        assert!(matches!(
            signing_credentials(&config),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_does_not_print_secret() {
        let credentials = SigningCredentials::from_secret(SECRET).unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("HS256"));
    }
}
