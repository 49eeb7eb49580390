//! Creation of user profiles
//!
//! The manager is the only path that persists new profiles: it normalizes the
//! email and encodes the password before handing the record to the store.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::{
    error::{FieldErrors, ProfileError, ProfileResult},
    models::{NewProfile, ProfileFields, USERNAME_FIELD, UserProfile},
    password::make_password,
    repositories::ProfileStore,
};

/// Manager for user profiles keyed by email
#[derive(Clone)]
pub struct UserProfileManager {
    store: Arc<dyn ProfileStore>,
}

impl UserProfileManager {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Lowercase the domain part of an email, leaving the local part untouched
    ///
    /// Splits on the last `@`; input without one is returned unchanged.
    pub fn normalize_email(email: &str) -> String {
        let email = email.trim();
        match email.rsplit_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => email.to_string(),
        }
    }

    /// Create and persist a regular profile
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        fields: ProfileFields,
    ) -> ProfileResult<UserProfile> {
        if email.trim().is_empty() {
            return Err(ProfileError::invalid(
                USERNAME_FIELD,
                "The Email field must be set",
            ));
        }

        let new_profile = NewProfile {
            email: Self::normalize_email(email),
            username: fields.username,
            password: make_password(password)?,
            first_name: fields.first_name,
            last_name: fields.last_name,
            date_joined: fields.date_joined.unwrap_or_else(Utc::now),
            last_login: fields.last_login,
            is_staff: fields.is_staff.unwrap_or(false),
            is_active: fields.is_active.unwrap_or(true),
            is_admin: fields.is_admin.unwrap_or(false),
            is_superuser: fields.is_superuser.unwrap_or(false),
            avatar: fields.avatar,
        };

        let profile = self.store.insert(&new_profile).await?;
        info!("Created user profile {}", profile);

        Ok(profile)
    }

    /// Create and persist a profile with staff and superuser rights
    ///
    /// Both flags default to true; passing either as false is rejected.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        mut fields: ProfileFields,
    ) -> ProfileResult<UserProfile> {
        let is_staff = *fields.is_staff.get_or_insert(true);
        let is_superuser = *fields.is_superuser.get_or_insert(true);

        let mut errors = FieldErrors::new();
        if !is_staff {
            errors.insert(
                "is_staff".to_string(),
                vec!["Superuser must have is_staff=True.".to_string()],
            );
        }
        if !is_superuser {
            errors.insert(
                "is_superuser".to_string(),
                vec!["Superuser must have is_superuser=True.".to_string()],
            );
        }
        if !errors.is_empty() {
            return Err(ProfileError::Validation(errors));
        }

        self.create_user(email, password, fields).await
    }
}
