//! Input validation utilities for the admin forms

use regex::Regex;
use std::sync::OnceLock;

const USERNAME_MAX_LENGTH: usize = 255;
const EMAIL_MAX_LENGTH: usize = 254;
const PASSWORD_MIN_LENGTH: usize = 8;
const NAME_MAX_LENGTH: usize = 255;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("This field is required.".to_string());
    }

    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            USERNAME_MAX_LENGTH
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("This field is required.".to_string());
    }

    if email.len() > EMAIL_MAX_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            EMAIL_MAX_LENGTH
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(())
}

/// Validate an optional first or last name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            NAME_MAX_LENGTH
        ));
    }

    Ok(())
}

/// Validate a new password: minimum length and not entirely numeric
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("This field is required.".to_string());
    }

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(format!(
            "This password is too short. It must contain at least {} characters.",
            PASSWORD_MIN_LENGTH
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("jane.doe+ops@corp").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("no-at-sign.example.com").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("").is_ok());
        assert!(validate_name(&"é".repeat(255)).is_ok());
        assert!(validate_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct-horse").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("1234567890").is_err());
    }
}
