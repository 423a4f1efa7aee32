//! Token signing and lifetime configuration.
//!
//! # Environment Variables
//!
//! - `RANQUE_SECRET`: symmetric signing secret (required, at least 32 bytes)
//! - `JWT_VALID_ISSUER`: `iss` written into and required from access tokens (default: `ranque-api`)
//! - `JWT_VALID_AUDIENCE`: `aud` written into and required from access tokens (default: `ranque-clients`)
//! - `JWT_EXPIRES`: access token lifetime in minutes (default: 15, at most 1440)
//! - `JWT_REFRESH_EXPIRY_DAYS`: refresh window opened by a password login (default: 7, at most 365)
//!
//! A missing, empty or too-short secret, or a lifetime that is not a whole
//! number within its range, is a startup-fatal [`AppError::Configuration`],
//! never a per-request error.

use std::env;
use std::fmt;

use chrono::Duration;
use ranque_core::AppError;

pub const SECRET_VAR: &str = "RANQUE_SECRET";

/// HMAC-SHA256 needs a key at least as long as its 256-bit output.
pub const MIN_SECRET_BYTES: usize = 32;

pub const DEFAULT_ISSUER: &str = "ranque-api";
pub const DEFAULT_AUDIENCE: &str = "ranque-clients";
pub const DEFAULT_EXPIRES_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
pub const MAX_EXPIRES_MINUTES: i64 = 24 * 60;
pub const MAX_REFRESH_EXPIRY_DAYS: i64 = 365;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub valid_issuer: String,
    pub valid_audience: String,
    /// Access token lifetime in minutes
    pub expires_minutes: i64,
    /// Refresh window in days, set on password login only
    pub refresh_token_expiry_days: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("valid_issuer", &self.valid_issuer)
            .field("valid_audience", &self.valid_audience)
            .field("expires_minutes", &self.expires_minutes)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish()
    }
}

impl JwtConfig {
    /// Builds a config with default issuer, audience and lifetimes.
    pub fn new(secret: impl Into<String>) -> Result<Self, AppError> {
        let secret = secret.into();
        validate_secret(&secret)?;

        Ok(Self {
            secret,
            valid_issuer: DEFAULT_ISSUER.to_string(),
            valid_audience: DEFAULT_AUDIENCE.to_string(),
            expires_minutes: DEFAULT_EXPIRES_MINUTES,
            refresh_token_expiry_days: DEFAULT_REFRESH_EXPIRY_DAYS,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`JwtConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::configuration(format!("{} is not set", SECRET_VAR)))?;
        validate_secret(&secret)?;

        Ok(Self {
            secret,
            valid_issuer: lookup("JWT_VALID_ISSUER")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            valid_audience: lookup("JWT_VALID_AUDIENCE")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            expires_minutes: lifetime(
                "JWT_EXPIRES",
                lookup("JWT_EXPIRES"),
                DEFAULT_EXPIRES_MINUTES,
                MAX_EXPIRES_MINUTES,
            )?,
            refresh_token_expiry_days: lifetime(
                "JWT_REFRESH_EXPIRY_DAYS",
                lookup("JWT_REFRESH_EXPIRY_DAYS"),
                DEFAULT_REFRESH_EXPIRY_DAYS,
                MAX_REFRESH_EXPIRY_DAYS,
            )?,
        })
    }

    /// Saturates instead of panicking when the field was set out of range by hand.
    pub fn access_token_lifetime(&self) -> Duration {
        Duration::try_minutes(self.expires_minutes).unwrap_or(Duration::MAX)
    }

    pub fn refresh_token_lifetime(&self) -> Duration {
        Duration::try_days(self.refresh_token_expiry_days).unwrap_or(Duration::MAX)
    }
}

/// Rejects secrets that are empty or too short for HMAC-SHA256.
pub fn validate_secret(secret: &str) -> Result<(), AppError> {
    if secret.is_empty() {
        return Err(AppError::configuration(format!("{} is empty", SECRET_VAR)));
    }
    if secret.len() < MIN_SECRET_BYTES {
        return Err(AppError::configuration(format!(
            "{} must be at least {} bytes, got {}",
            SECRET_VAR,
            MIN_SECRET_BYTES,
            secret.len()
        )));
    }
    Ok(())
}

fn lifetime(var: &str, value: Option<String>, default: i64, max: i64) -> Result<i64, AppError> {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(parsed) if (1..=max).contains(&parsed) => Ok(parsed),
        _ => Err(AppError::configuration(format!(
            "{} must be a whole number between 1 and {}, got {:?}",
            var, max, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let result = JwtConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = JwtConfig::from_lookup(lookup_from(&[(SECRET_VAR, "")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_short_secret_is_configuration_error() {
        let result = JwtConfig::from_lookup(lookup_from(&[(SECRET_VAR, "too-short")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = JwtConfig::from_lookup(lookup_from(&[(SECRET_VAR, SECRET)])).unwrap();
        assert_eq!(config.valid_issuer, DEFAULT_ISSUER);
        assert_eq!(config.valid_audience, DEFAULT_AUDIENCE);
        assert_eq!(config.expires_minutes, 15);
        assert_eq!(config.refresh_token_expiry_days, 7);
        assert_eq!(config.access_token_lifetime(), Duration::minutes(15));
        assert_eq!(config.refresh_token_lifetime(), Duration::days(7));
    }

    #[test]
    fn test_overrides() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            (SECRET_VAR, SECRET),
            ("JWT_VALID_ISSUER", "issuer.example"),
            ("JWT_VALID_AUDIENCE", "audience.example"),
            ("JWT_EXPIRES", "30"),
            ("JWT_REFRESH_EXPIRY_DAYS", "365"),
        ]))
        .unwrap();
        assert_eq!(config.valid_issuer, "issuer.example");
        assert_eq!(config.valid_audience, "audience.example");
        assert_eq!(config.expires_minutes, 30);
        assert_eq!(config.refresh_token_expiry_days, 365);
    }

    #[test]
    fn test_out_of_range_lifetimes_fail_at_startup() {
        let cases = [
            ("JWT_EXPIRES", "1000000000000"),
            ("JWT_EXPIRES", "1441"),
            ("JWT_EXPIRES", "0"),
            ("JWT_EXPIRES", "fifteen"),
            ("JWT_REFRESH_EXPIRY_DAYS", "-3"),
            ("JWT_REFRESH_EXPIRY_DAYS", "366"),
            ("JWT_REFRESH_EXPIRY_DAYS", "9223372036854775807"),
        ];

        for (var, value) in cases {
            let result = JwtConfig::from_lookup(lookup_from(&[(SECRET_VAR, SECRET), (var, value)]));
            assert!(
                matches!(result, Err(AppError::Configuration(_))),
                "{}={} was accepted",
                var,
                value
            );
        }
    }

    #[test]
    fn test_lifetime_saturates_when_field_set_by_hand() {
        let mut config = JwtConfig::new(SECRET).unwrap();
        config.expires_minutes = i64::MAX;
        config.refresh_token_expiry_days = i64::MAX;
        assert_eq!(config.access_token_lifetime(), Duration::MAX);
        assert_eq!(config.refresh_token_lifetime(), Duration::MAX);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new(SECRET).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("[redacted]"));
    }
}
