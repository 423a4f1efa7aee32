//! Registration rules applied before a user is created.
//!
//! The password rules follow the identity framework defaults: at least six
//! characters with a digit, a lowercase letter, an uppercase letter and a
//! non-alphanumeric character.

use ranque_core::FieldError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const ALLOWED_USER_NAME_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@+";

pub fn check_password(password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "PasswordTooShort",
            format!(
                "Passwords must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        errors.push(FieldError::new(
            "PasswordRequiresNonAlphanumeric",
            "Passwords must have at least one non alphanumeric character.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new(
            "PasswordRequiresDigit",
            "Passwords must have at least one digit ('0'-'9').",
        ));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        errors.push(FieldError::new(
            "PasswordRequiresLower",
            "Passwords must have at least one lowercase ('a'-'z').",
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        errors.push(FieldError::new(
            "PasswordRequiresUpper",
            "Passwords must have at least one uppercase ('A'-'Z').",
        ));
    }

    errors
}

pub fn check_user_name(user_name: &str) -> Option<FieldError> {
    let valid = !user_name.is_empty()
        && user_name
            .chars()
            .all(|c| ALLOWED_USER_NAME_CHARACTERS.contains(c));

    (!valid).then(|| {
        FieldError::new(
            "InvalidUserName",
            format!(
                "Username '{}' is invalid, can only contain letters or digits.",
                user_name
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(check_password("Str0ng!pass").is_empty());
    }

    #[test]
    fn test_weak_password_reports_every_rule() {
        assert_eq!(
            codes(&check_password("abc")),
            vec![
                "PasswordTooShort",
                "PasswordRequiresNonAlphanumeric",
                "PasswordRequiresDigit",
                "PasswordRequiresUpper",
            ]
        );
    }

    #[test]
    fn test_user_name_characters() {
        assert!(check_user_name("alice.smith+ranque@example").is_none());
        assert_eq!(
            check_user_name("alice smith").map(|e| e.code),
            Some("InvalidUserName".to_string())
        );
        assert!(check_user_name("").is_some());
    }
}
