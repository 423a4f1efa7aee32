//! Store capabilities the authentication core depends on.
//!
//! The core never talks to a database directly. It needs a credential store
//! (lookup, password check, creation, session persistence) and a role store
//! (membership lookup and assignment). Both are object-safe so the service
//! can hold `Arc<dyn UserStore>` and swap in the in-memory adapter for tests.

use async_trait::async_trait;
use ranque_core::{AppError, verify_password};
use ranque_models::{NewUser, SessionState, User};
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks a user up by name. Matching is case-insensitive.
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// [`AppError::Registration`] with a `DuplicateUserName` entry if the name
    /// is taken, [`AppError::Persistence`] on storage failure.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    /// Persists the refresh-token fields of a user in one write.
    ///
    /// Either both fields are stored or neither is.
    async fn update_session(&self, user_id: Uuid, session: &SessionState) -> Result<(), AppError>;

    /// Verifies a plaintext password against the user's stored hash.
    async fn check_password(&self, user: &User, password: &str) -> Result<bool, AppError> {
        verify_password(password, &user.password_hash)
    }
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Names of the roles currently assigned to `user`, in a stable order.
    async fn roles_of(&self, user: &User) -> Result<Vec<String>, AppError>;

    async fn role_exists(&self, role: &str) -> Result<bool, AppError>;

    async fn add_to_roles(&self, user: &User, roles: &[String]) -> Result<(), AppError>;
}

/// Normalised form used for case-insensitive name matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

pub fn duplicate_user_name(user_name: &str) -> AppError {
    AppError::Registration(vec![ranque_core::FieldError::new(
        "DuplicateUserName",
        format!("Username '{}' is already taken.", user_name),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(" Alice "), "ALICE");
        assert_eq!(normalize_name("alice"), normalize_name("ALICE"));
    }

    #[test]
    fn test_duplicate_user_name_error() {
        match duplicate_user_name("alice") {
            AppError::Registration(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code, "DuplicateUserName");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
