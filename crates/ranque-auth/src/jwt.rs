//! Access token issuing and validation.
//!
//! Tokens use the compact JWS encoding: three base64url segments (header,
//! payload, signature). The header declares `HS256`/`JWT`; the payload
//! carries `iss`, `aud`, `exp`, `iat` and the [`Claims`] built by
//! [`build_claims`](crate::claims::build_claims).
//!
//! There is exactly one validation routine, [`validate_access_token`].
//! The resource path calls it with [`ExpiryCheck::Enforce`]; the refresh
//! path calls it with [`ExpiryCheck::Skip`]. Algorithm, signature, issuer
//! and audience rules are identical for both.
//!
//! # Example
//!
//! ```ignore
//! use ranque_auth::{build_claims, create_access_token, signing_credentials, verify_token};
//!
//! let credentials = signing_credentials(&config)?;
//! let token = create_access_token(&build_claims(&user, &roles), &credentials, &config, now)?;
//! let payload = verify_token(&token, &credentials, &config, now)?;
//! ```

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Header, Validation, decode, encode};
use ranque_config::JwtConfig;
use ranque_core::AppError;
use tracing::debug;

use crate::claims::{AccessTokenClaims, Claims};
use crate::signing::SigningCredentials;

/// Whether [`validate_access_token`] rejects tokens past their `exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryCheck {
    Enforce,
    Skip,
}

/// Creates a signed access token valid from `issued_at` for the configured TTL.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the expiry is not representable or
/// encoding fails.
pub fn create_access_token(
    claims: &Claims,
    credentials: &SigningCredentials,
    config: &JwtConfig,
    issued_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let expires_at = issued_at
        .checked_add_signed(config.access_token_lifetime())
        .ok_or_else(|| AppError::internal(anyhow::anyhow!("Access token expiry overflowed")))?;

    let payload = AccessTokenClaims {
        iss: config.valid_issuer.clone(),
        aud: config.valid_audience.clone(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        claims: claims.clone(),
    };

    encode(
        &Header::new(credentials.algorithm()),
        &payload,
        credentials.encoding_key(),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

/// Validates an access token's structure, algorithm, signature, issuer and
/// audience, and its expiry against `now` unless `expiry` is [`ExpiryCheck::Skip`].
///
/// # Errors
///
/// Every failure maps to [`AppError::InvalidToken`].
pub fn validate_access_token(
    token: &str,
    credentials: &SigningCredentials,
    config: &JwtConfig,
    now: DateTime<Utc>,
    expiry: ExpiryCheck,
) -> Result<AccessTokenClaims, AppError> {
    let payload = decode::<AccessTokenClaims>(
        token,
        credentials.decoding_key(),
        &validation(credentials, config),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(reason = rejection_reason(e.kind()), "access token rejected");
        AppError::InvalidToken
    })?;

    if expiry == ExpiryCheck::Enforce && payload.exp <= now.timestamp() {
        debug!(reason = "expired", "access token rejected");
        return Err(AppError::InvalidToken);
    }

    Ok(payload)
}

/// Validates an access token including its expiry.
pub fn verify_token(
    token: &str,
    credentials: &SigningCredentials,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<AccessTokenClaims, AppError> {
    validate_access_token(token, credentials, config, now, ExpiryCheck::Enforce)
}

/// Validates a possibly expired access token. Everything except `exp` is checked.
pub fn verify_expired_token(
    token: &str,
    credentials: &SigningCredentials,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<AccessTokenClaims, AppError> {
    validate_access_token(token, credentials, config, now, ExpiryCheck::Skip)
}

fn validation(credentials: &SigningCredentials, config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(credentials.algorithm());
    validation.set_issuer(&[config.valid_issuer.as_str()]);
    validation.set_audience(&[config.valid_audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    // exp is compared against the injected clock in validate_access_token
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.leeway = 0;
    validation
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidSignature => "invalid_signature",
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => "invalid_algorithm",
        ErrorKind::InvalidIssuer => "invalid_issuer",
        ErrorKind::InvalidAudience => "invalid_audience",
        ErrorKind::MissingRequiredClaim(_) => "missing_claim",
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => "malformed",
        ErrorKind::Json(_) => "malformed_payload",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret-key-at-least-32-characters-long").unwrap()
    }

    fn claims() -> Claims {
        Claims {
            name: "alice".to_string(),
            sub: "5b0c6f8e-3a43-4a4e-9a3b-1f0d2c6e7a10".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec!["Participant".to_string()],
        }
    }

    #[test]
    fn test_token_has_three_segments() {
        let config = config();
        let credentials = SigningCredentials::from_secret(&config.secret).unwrap();
        let token = create_access_token(&claims(), &credentials, &config, Utc::now()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_expiry_is_ttl_after_issue() {
        let config = config();
        let credentials = SigningCredentials::from_secret(&config.secret).unwrap();
        let now = Utc::now();
        let token = create_access_token(&claims(), &credentials, &config, now).unwrap();
        let payload = verify_token(&token, &credentials, &config, now).unwrap();
        assert_eq!(payload.exp - payload.iat, 15 * 60);
        assert_eq!(payload.iat, now.timestamp());
    }

    #[test]
    fn test_exp_boundary_is_expired() {
        let config = config();
        let credentials = SigningCredentials::from_secret(&config.secret).unwrap();
        let now = Utc::now();
        let token = create_access_token(&claims(), &credentials, &config, now).unwrap();

        let just_before = now + Duration::minutes(15) - Duration::seconds(1);
        assert!(verify_token(&token, &credentials, &config, just_before).is_ok());

        let at_expiry = now + Duration::minutes(15);
        assert!(matches!(
            verify_token(&token, &credentials, &config, at_expiry),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_unrepresentable_expiry_is_internal_error() {
        let mut config = config();
        config.expires_minutes = i64::MAX;
        let credentials = SigningCredentials::from_secret(&config.secret).unwrap();

        let result = create_access_token(&claims(), &credentials, &config, Utc::now());
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_rejection_reason_for_signature() {
        assert_eq!(rejection_reason(&ErrorKind::InvalidSignature), "invalid_signature");
        assert_eq!(rejection_reason(&ErrorKind::InvalidAlgorithm), "invalid_algorithm");
    }
}
