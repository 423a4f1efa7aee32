use ranque::modules::auth::policy::{MIN_PASSWORD_LENGTH, check_password, check_user_name};
use ranque_core::{hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let hash = hash_password("Str0ng!pass").unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, "Str0ng!pass");
    assert!(hash.starts_with("$2"));
}

#[test]
fn test_hash_password_salted() {
    let first = hash_password("Str0ng!pass").unwrap();
    let second = hash_password("Str0ng!pass").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("Str0ng!pass", &first).unwrap());
    assert!(verify_password("Str0ng!pass", &second).unwrap());
}

#[test]
fn test_verify_password_wrong() {
    let hash = hash_password("Str0ng!pass").unwrap();

    assert!(!verify_password("str0ng!pass", &hash).unwrap());
    assert!(!verify_password("", &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    assert!(verify_password("Str0ng!pass", "not-a-bcrypt-hash").is_err());
}

#[test]
fn test_policy_accepts_minimum_strong_password() {
    let password = "Aa1!bc";
    assert_eq!(password.len(), MIN_PASSWORD_LENGTH);
    assert!(check_password(password).is_empty());
}

#[test]
fn test_policy_reports_each_missing_class() {
    let cases = [
        ("aa1!bcd", "PasswordRequiresUpper"),
        ("AA1!BCD", "PasswordRequiresLower"),
        ("Aab!bcd", "PasswordRequiresDigit"),
        ("Aa1bbcd", "PasswordRequiresNonAlphanumeric"),
        ("Aa1!b", "PasswordTooShort"),
    ];

    for (password, code) in cases {
        let errors = check_password(password);
        assert_eq!(errors.len(), 1, "{}", password);
        assert_eq!(errors[0].code, code);
    }
}

#[test]
fn test_user_name_rules() {
    assert!(check_user_name("alice").is_none());
    assert!(check_user_name("a.l-i_c+e@x").is_none());
    assert!(check_user_name("alice!").is_some());
    assert!(check_user_name("al ice").is_some());
}
