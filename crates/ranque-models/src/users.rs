//! User identity records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::session::SessionState;

/// Identity record owned by the credential store.
///
/// The auth core only ever writes the [`SessionState`] fields.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
    #[sqlx(flatten)]
    pub session: SessionState,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Fields handed to the store when creating a user. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
}

/// Public view of a user, without credentials or session fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: &User, roles: Vec<String>) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: None,
            password_hash: "$2b$12$hashhashhash".to_string(),
            session: SessionState {
                refresh_token: Some("opaque-refresh".to_string()),
                refresh_token_expiry_time: None,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_debug_hides_credentials() {
        let debug = format!("{:?}", sample_user());
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hashhashhash"));
        assert!(!debug.contains("opaque-refresh"));
    }

    #[test]
    fn test_profile_serializes_without_secrets() {
        let user = sample_user();
        let profile = UserProfile::new(&user, vec!["Participant".to_string()]);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains(r#""user_name":"alice""#));
        assert!(json.contains(r#""roles":["Participant"]"#));
        assert!(!json.contains("password"));
        assert!(!json.contains("refresh"));
    }
}
