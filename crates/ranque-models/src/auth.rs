//! Authentication request and response DTOs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login credentials. Never persisted.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, message = "user_name is required"))]
    #[schema(example = "alice")]
    pub user_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "Str0ng!pass")]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Registration request. Password strength is checked by the service, not here.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 256, message = "user_name is required"))]
    #[schema(example = "alice")]
    pub user_name: String,
    #[validate(email(message = "email is invalid"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "Str0ng!pass")]
    pub password: String,
    #[serde(default)]
    #[schema(example = json!(["Participant"]))]
    pub roles: Vec<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Access/refresh token pair.
///
/// Returned by login and refresh, and accepted by refresh. `user_name` is
/// informational on input and ignored by the refresh protocol.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct TokenPair {
    #[validate(length(min = 1, message = "access_token is required"))]
    pub access_token: String,
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
    #[serde(default)]
    pub user_name: String,
}

impl TokenPair {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user_name: user_name.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("user_name", &self.user_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        let credentials = Credentials {
            user_name: String::new(),
            password: "x".to_string(),
        };
        assert!(credentials.validate().is_err());

        let credentials = Credentials {
            user_name: "alice".to_string(),
            password: String::new(),
        };
        assert!(credentials.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            user_name: "alice".to_string(),
            password: "Str0ng!pass".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("Str0ng!pass"));
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let json = r#"{"user_name":"alice","email":"not-an-email","password":"Str0ng!pass"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert!(request.roles.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_pair_user_name_optional_on_input() {
        let json = r#"{"access_token":"a.b.c","refresh_token":"r"}"#;
        let pair: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.user_name, "");
        assert!(pair.validate().is_ok());
    }

    #[test]
    fn test_token_pair_requires_both_tokens() {
        let pair = TokenPair::new("a.b.c", "", "alice");
        assert!(pair.validate().is_err());
    }

    #[test]
    fn test_token_pair_debug_redacts_tokens() {
        let pair = TokenPair::new("header.payload.sig", "opaque", "alice");
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("header.payload.sig"));
        assert!(!debug.contains("opaque"));
    }
}
