//! Admin panel configuration for user profiles
//!
//! The changelist shows [`LIST_DISPLAY`] columns ordered by email, can be
//! narrowed with the [`LIST_FILTER`] flags and searched over
//! [`SEARCH_FIELDS`]. The change view groups fields the way the admin
//! fieldsets do, and the add form takes the password twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::FieldErrors,
    models::{ProfileFields, UserProfile, avatar_path, full_name},
    password::is_password_usable,
    repositories::ProfileFilter,
    validation::{validate_email, validate_name, validate_password, validate_username},
};

pub const LIST_DISPLAY: [&str; 6] = [
    "email",
    "username",
    "first_name",
    "last_name",
    "is_staff",
    "is_active",
];
pub const LIST_FILTER: [&str; 3] = ["is_staff", "is_active", "is_admin"];
pub const SEARCH_FIELDS: [&str; 2] = ["email", "username"];
pub const ORDERING: &str = "email";

/// Changelist query string: `q` searches, flags filter
#[derive(Debug, Default, Deserialize)]
pub struct ChangelistQuery {
    pub q: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

impl From<ChangelistQuery> for ProfileFilter {
    fn from(query: ChangelistQuery) -> Self {
        let search = query
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        ProfileFilter {
            search,
            is_staff: query.is_staff,
            is_active: query.is_active,
            is_admin: query.is_admin,
        }
    }
}

/// One changelist line
#[derive(Debug, Serialize)]
pub struct ChangelistRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<UserProfile> for ChangelistRow {
    fn from(profile: UserProfile) -> Self {
        ChangelistRow {
            id: profile.id,
            email: profile.email,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            is_staff: profile.is_staff,
            is_active: profile.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Changelist {
    pub columns: [&'static str; 6],
    pub filters: [&'static str; 3],
    pub search_fields: [&'static str; 2],
    pub ordering: &'static str,
    pub count: usize,
    pub results: Vec<ChangelistRow>,
}

impl Changelist {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        let results: Vec<ChangelistRow> = profiles.into_iter().map(ChangelistRow::from).collect();

        Changelist {
            columns: LIST_DISPLAY,
            filters: LIST_FILTER,
            search_fields: SEARCH_FIELDS,
            ordering: ORDERING,
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub has_usable_password: bool,
}

#[derive(Debug, Serialize)]
pub struct PersonalInfo {
    pub username: String,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Permissions {
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportantDates {
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

/// Change view of a single profile, grouped by fieldset. Never exposes the hash.
#[derive(Debug, Serialize)]
pub struct ProfileChangeView {
    pub id: i64,
    pub credentials: Credentials,
    pub personal_info: PersonalInfo,
    pub permissions: Permissions,
    pub important_dates: ImportantDates,
}

impl From<UserProfile> for ProfileChangeView {
    fn from(profile: UserProfile) -> Self {
        let full_name = full_name(&profile);

        ProfileChangeView {
            id: profile.id,
            credentials: Credentials {
                has_usable_password: is_password_usable(&profile.password),
                email: profile.email,
            },
            personal_info: PersonalInfo {
                full_name,
                username: profile.username,
                first_name: profile.first_name,
                last_name: profile.last_name,
                avatar: profile.avatar,
            },
            permissions: Permissions {
                is_staff: profile.is_staff,
                is_active: profile.is_active,
                is_superuser: profile.is_superuser,
                is_admin: profile.is_admin,
            },
            important_dates: ImportantDates {
                last_login: profile.last_login,
                date_joined: profile.date_joined,
            },
        }
    }
}

fn default_true() -> bool {
    true
}

/// Add form submitted from the admin
#[derive(Debug, Default, Deserialize)]
pub struct AddProfileForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// File name of an avatar already uploaded to the media store
    pub avatar: Option<String>,
}

/// Superuser creation request
#[derive(Debug, Default, Deserialize)]
pub struct SuperuserForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Arguments for the manager, extracted from a valid form
#[derive(Debug)]
pub struct CleanedProfile {
    pub email: String,
    pub password: String,
    pub fields: ProfileFields,
}

fn push_error(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

/// Validate the add form and collect every field error
pub fn clean_add_form(form: &AddProfileForm) -> Result<CleanedProfile, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = form.email.as_deref().map(str::trim).unwrap_or_default();
    if let Err(e) = validate_email(email) {
        push_error(&mut errors, "email", e);
    }

    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    if let Err(e) = validate_username(username) {
        push_error(&mut errors, "username", e);
    }

    let password1 = form.password1.as_deref().unwrap_or_default();
    let password2 = form.password2.as_deref().unwrap_or_default();
    if password1.is_empty() {
        push_error(&mut errors, "password1", "This field is required.".to_string());
    }
    if password2.is_empty() {
        push_error(&mut errors, "password2", "This field is required.".to_string());
    } else if !password1.is_empty() && password1 != password2 {
        push_error(
            &mut errors,
            "password2",
            "The two password fields didn't match.".to_string(),
        );
    } else if let Err(e) = validate_password(password2) {
        push_error(&mut errors, "password2", e);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CleanedProfile {
        email: email.to_string(),
        password: password1.to_string(),
        fields: ProfileFields {
            username: username.to_string(),
            is_staff: Some(form.is_staff),
            is_active: Some(form.is_active),
            is_admin: Some(form.is_admin),
            avatar: form
                .avatar
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(avatar_path),
            ..ProfileFields::default()
        },
    })
}

/// Validate the superuser request and collect every field error
///
/// Flag checks stay with the manager.
pub fn clean_superuser_form(form: SuperuserForm) -> Result<CleanedProfile, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = form
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if let Err(e) = validate_email(&email) {
        push_error(&mut errors, "email", e);
    }

    let username = form
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if let Err(e) = validate_username(&username) {
        push_error(&mut errors, "username", e);
    }

    let password = form.password.unwrap_or_default();
    if password.is_empty() {
        push_error(&mut errors, "password", "This field is required.".to_string());
    }

    for (field, value) in [
        ("first_name", form.first_name.as_deref()),
        ("last_name", form.last_name.as_deref()),
    ] {
        if let Some(Err(e)) = value.map(validate_name) {
            push_error(&mut errors, field, e);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CleanedProfile {
        email,
        password,
        fields: ProfileFields {
            username,
            first_name: form.first_name,
            last_name: form.last_name,
            is_staff: form.is_staff,
            is_superuser: form.is_superuser,
            ..ProfileFields::default()
        },
    })
}
