//! Password hashing and verification for user profiles
//!
//! Passwords are stored as argon2 PHC strings. Profiles created without a
//! password get an unusable marker that never verifies.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{Rng, distributions::Alphanumeric};

use crate::{
    error::{ProfileError, ProfileResult},
    models::UserProfile,
};

/// Prefix marking an encoded password as unusable
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';
const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Hash a raw password with argon2 and a random salt
pub fn hash_password(raw: &str) -> ProfileResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| ProfileError::PasswordHash(e.to_string()))?
        .to_string();

    Ok(hash)
}

/// Encoded form of an optional raw password
pub fn make_password(raw: Option<&str>) -> ProfileResult<String> {
    match raw {
        Some(raw) => hash_password(raw),
        None => Ok(unusable_password()),
    }
}

/// Random marker that no password matches
pub fn unusable_password() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    format!("{}{}", UNUSABLE_PASSWORD_PREFIX, suffix)
}

pub fn is_password_usable(encoded: &str) -> bool {
    !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Check a raw password against an encoded one
pub fn verify_password(raw: &str, encoded: &str) -> bool {
    if !is_password_usable(encoded) {
        return false;
    }

    match PasswordHash::new(encoded) {
        Ok(parsed) => Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

/// Replace the profile's password; `None` makes it unusable
pub fn set_password(profile: &mut UserProfile, raw: Option<&str>) -> ProfileResult<()> {
    profile.password = make_password(raw)?;
    Ok(())
}

pub fn check_password(profile: &UserProfile, raw: &str) -> bool {
    verify_password(raw, &profile.password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::profile;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unusable_password() {
        let marker = make_password(None).unwrap();
        assert_eq!(marker.len(), 1 + UNUSABLE_PASSWORD_SUFFIX_LENGTH);
        assert!(!is_password_usable(&marker));
        assert!(!verify_password("", &marker));
        assert!(!verify_password(&marker, &marker));
    }

    #[test]
    fn test_set_and_check_password() {
        let mut jane = profile("jane@example.com");
        assert!(!check_password(&jane, "pw"));

        set_password(&mut jane, Some("pw")).unwrap();
        assert!(check_password(&jane, "pw"));
        assert!(!check_password(&jane, "PW"));

        set_password(&mut jane, None).unwrap();
        assert!(!check_password(&jane, "pw"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("pw", "not-a-phc-string"));
    }
}
