//! Claims assembly.
//!
//! [`build_claims`] is a pure function of a user record and its current
//! role membership. The claim order is fixed: name, subject id, email,
//! then one role claim per role in the order the role store returned them.

use chrono::{DateTime, Utc};
use ranque_models::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    Name,
    NameIdentifier,
    Email,
    Role,
}

impl ClaimType {
    /// The JSON member name the claim is written under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameIdentifier => "sub",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

/// Identity claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User name (subject name)
    #[serde(default)]
    pub name: String,
    /// User id (subject identifier)
    pub sub: String,
    pub email: String,
    /// One entry per assigned role
    #[serde(rename = "role", default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Claims {
    /// Claims as ordered `(type, value)` pairs.
    pub fn entries(&self) -> Vec<(ClaimType, &str)> {
        let mut entries = vec![
            (ClaimType::Name, self.name.as_str()),
            (ClaimType::NameIdentifier, self.sub.as_str()),
            (ClaimType::Email, self.email.as_str()),
        ];
        entries.extend(self.roles.iter().map(|r| (ClaimType::Role, r.as_str())));
        entries
    }
}

/// Full access-token payload: registered claims plus the identity claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub aud: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    #[serde(flatten)]
    pub claims: Claims,
}

impl AccessTokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

pub fn build_claims(user: &User, roles: &[String]) -> Claims {
    Claims {
        name: user.user_name.clone(),
        sub: user.id.to_string(),
        email: user.email.clone(),
        roles: roles.to_vec(),
    }
}
