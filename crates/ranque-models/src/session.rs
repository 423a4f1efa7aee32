//! Per-user refresh session state.
//!
//! A user holds at most one live refresh token. Issuing a new pair
//! overwrites it, which is what makes a consumed refresh token
//! unusable on replay.

use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Why a presented refresh token was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// No refresh token has been issued yet.
    NoActiveToken,
    /// The presented token is not the current one.
    TokenMismatch,
    /// The refresh window has closed.
    Expired,
}

impl SessionRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoActiveToken => "no_active_token",
            Self::TokenMismatch => "token_mismatch",
            Self::Expired => "expired",
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, FromRow)]
pub struct SessionState {
    pub refresh_token: Option<String>,
    pub refresh_token_expiry_time: Option<DateTime<Utc>>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("refresh_token_expiry_time", &self.refresh_token_expiry_time)
            .finish()
    }
}

impl SessionState {
    /// Checks a presented refresh token against this session at `now`.
    ///
    /// A session with no expiry recorded is treated as already expired.
    pub fn check(&self, presented: &str, now: DateTime<Utc>) -> Result<(), SessionRejection> {
        let current = self
            .refresh_token
            .as_deref()
            .ok_or(SessionRejection::NoActiveToken)?;

        if !constant_time_eq(current.as_bytes(), presented.as_bytes()) {
            return Err(SessionRejection::TokenMismatch);
        }

        match self.refresh_token_expiry_time {
            Some(expiry) if expiry > now => Ok(()),
            _ => Err(SessionRejection::Expired),
        }
    }

    pub fn accepts(&self, presented: &str, now: DateTime<Utc>) -> bool {
        self.check(presented, now).is_ok()
    }

    /// Replaces the refresh token. The expiry only moves when `expiry` is `Some`.
    pub fn rotate(&mut self, refresh_token: String, expiry: Option<DateTime<Utc>>) {
        self.refresh_token = Some(refresh_token);
        if let Some(expiry) = expiry {
            self.refresh_token_expiry_time = Some(expiry);
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
