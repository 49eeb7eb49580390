//! Application state shared across handlers

use std::sync::Arc;

use crate::repositories::{OrderStore, OrderTagStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderStore>,
    pub order_tags: Arc<dyn OrderTagStore>,
}
