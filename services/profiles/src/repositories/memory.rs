//! In-memory profile store used by the tests

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};

use super::{ProfileFilter, ProfileStore};
use crate::models::{NewProfile, UserProfile};

/// Case-insensitive substring search over email and username, plus exact flag filters
fn matches(filter: &ProfileFilter, profile: &UserProfile) -> bool {
    let search_hit = match filter.search.as_deref() {
        Some(term) => {
            let term = term.to_lowercase();
            profile.email.to_lowercase().contains(&term)
                || profile.username.to_lowercase().contains(&term)
        }
        None => true,
    };

    search_hit
        && filter.is_staff.is_none_or(|flag| profile.is_staff == flag)
        && filter.is_active.is_none_or(|flag| profile.is_active == flag)
        && filter.is_admin.is_none_or(|flag| profile.is_admin == flag)
}

#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<Vec<UserProfile>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` report the store as unreachable
    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn insert(&self, profile: &NewProfile) -> DatabaseResult<UserProfile> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());

        if profiles.iter().any(|p| p.email == profile.email) {
            return Err(DatabaseError::UniqueViolation("email".to_string()));
        }
        if profiles.iter().any(|p| p.username == profile.username) {
            return Err(DatabaseError::UniqueViolation("username".to_string()));
        }

        let stored = UserProfile {
            id: profiles.len() as i64 + 1,
            email: profile.email.clone(),
            username: profile.username.clone(),
            password: profile.password.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            date_joined: profile.date_joined,
            last_login: profile.last_login,
            is_staff: profile.is_staff,
            is_active: profile.is_active,
            is_admin: profile.is_admin,
            is_superuser: profile.is_superuser,
            avatar: profile.avatar.clone(),
        };
        profiles.push(stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserProfile>> {
        let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn search(&self, filter: &ProfileFilter) -> DatabaseResult<Vec<UserProfile>> {
        let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
        let mut found: Vec<UserProfile> = profiles
            .iter()
            .filter(|p| matches(filter, p))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.email.cmp(&b.email));

        Ok(found)
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        Ok(!self.offline.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::profile;

    #[test]
    fn test_filter_matches() {
        let mut jane = profile("Jane@example.com");
        jane.is_staff = true;

        let by_search = ProfileFilter {
            search: Some("JANE".to_string()),
            ..Default::default()
        };
        let by_flags = ProfileFilter {
            is_staff: Some(true),
            is_active: Some(true),
            ..Default::default()
        };
        let admins = ProfileFilter {
            is_admin: Some(true),
            ..Default::default()
        };
        let other_name = ProfileFilter {
            search: Some("bob".to_string()),
            ..Default::default()
        };

        assert!(matches(&ProfileFilter::default(), &jane));
        assert!(matches(&by_search, &jane));
        assert!(matches(&by_flags, &jane));
        assert!(!matches(&admins, &jane));
        assert!(!matches(&other_name, &jane));
    }
}
