//! Profile repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{NewProfile, UserProfile};

#[cfg(test)]
pub mod memory;

/// Changelist constraints: a search term over email/username plus flag filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Storage operations on user profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a profile, failing with `UniqueViolation` on a taken email or username
    async fn insert(&self, profile: &NewProfile) -> DatabaseResult<UserProfile>;

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserProfile>>;

    /// Profiles matching `filter`, ordered by email
    async fn search(&self, filter: &ProfileFilter) -> DatabaseResult<Vec<UserProfile>>;

    async fn ping(&self) -> DatabaseResult<bool>;
}

/// Escape `LIKE` wildcards and wrap the term for a substring match
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn profile_from_row(row: &PgRow) -> UserProfile {
    UserProfile {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password: row.get("password"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        date_joined: row.get("date_joined"),
        last_login: row.get("last_login"),
        is_staff: row.get("is_staff"),
        is_active: row.get("is_active"),
        is_admin: row.get("is_admin"),
        is_superuser: row.get("is_superuser"),
        avatar: row.get("avatar"),
    }
}

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn insert(&self, profile: &NewProfile) -> DatabaseResult<UserProfile> {
        info!("Inserting user profile: {}", profile.email);

        let row = sqlx::query(
            r#"
            INSERT INTO user_profiles (
                email, username, password, first_name, last_name, date_joined,
                last_login, is_staff, is_active, is_admin, is_superuser, avatar
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, email, username, password, first_name, last_name, date_joined,
                      last_login, is_staff, is_active, is_admin, is_superuser, avatar
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.username)
        .bind(&profile.password)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.date_joined)
        .bind(profile.last_login)
        .bind(profile.is_staff)
        .bind(profile.is_active)
        .bind(profile.is_admin)
        .bind(profile.is_superuser)
        .bind(&profile.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(profile_from_row(&row))
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, password, first_name, last_name, date_joined,
                   last_login, is_staff, is_active, is_admin, is_superuser, avatar
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(profile_from_row))
    }

    async fn search(&self, filter: &ProfileFilter) -> DatabaseResult<Vec<UserProfile>> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let rows = sqlx::query(
            r#"
            SELECT id, email, username, password, first_name, last_name, date_joined,
                   last_login, is_staff, is_active, is_admin, is_superuser, avatar
            FROM user_profiles
            WHERE ($1::TEXT IS NULL OR email ILIKE $1 OR username ILIKE $1)
              AND ($2::BOOLEAN IS NULL OR is_staff = $2)
              AND ($3::BOOLEAN IS NULL OR is_active = $3)
              AND ($4::BOOLEAN IS NULL OR is_admin = $4)
            ORDER BY email
            "#,
        )
        .bind(pattern)
        .bind(filter.is_staff)
        .bind(filter.is_active)
        .bind(filter.is_admin)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        common::database::health_check(&self.pool).await
    }
}
