//! Application state shared across handlers

use std::sync::Arc;

use crate::{manager::UserProfileManager, repositories::ProfileStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub manager: UserProfileManager,
}

impl AppState {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        let manager = UserProfileManager::new(profiles.clone());
        Self { profiles, manager }
    }
}
