//! User profiles keyed by email
//!
//! This crate provides the profile model, the manager that creates regular
//! users and superusers, password helpers, storage, and the admin routes
//! served by the profiles binary.

pub mod admin;
pub mod error;
pub mod manager;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
