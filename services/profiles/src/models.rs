//! User profile model and related functionality

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Field used to authenticate a profile
pub const USERNAME_FIELD: &str = "email";

/// Directory avatars are stored under in the media store
pub const AVATAR_UPLOAD_DIR: &str = "avatars/";

/// User profile entity, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Encoded password hash, or an unusable marker
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub avatar: Option<String>,
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Profile ready to be inserted; email already normalized and password encoded
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub avatar: Option<String>,
}

/// Optional fields accepted by the manager alongside email and password
///
/// Unset flags fall back to the model defaults: active, not staff, not admin,
/// not superuser.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_superuser: Option<bool>,
    pub date_joined: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

/// First and last name separated by a space; missing parts are left out
pub fn full_name(profile: &UserProfile) -> String {
    [profile.first_name.as_deref(), profile.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The identifier a profile authenticates with (its email)
pub fn username_field(profile: &UserProfile) -> &str {
    &profile.email
}

/// Loaded profiles are always authenticated principals
pub fn is_authenticated(_profile: &UserProfile) -> bool {
    true
}

/// Storage path for an uploaded avatar file
pub fn avatar_path(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    format!("{}{}", AVATAR_UPLOAD_DIR, name)
}
