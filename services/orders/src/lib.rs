//! Orders and order tags
//!
//! List/create endpoints for both record types, a date-range filter over
//! orders and the deactivate mutation.

pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
