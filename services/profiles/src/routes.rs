//! Profiles service routes

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    admin::{
        AddProfileForm, Changelist, ChangelistQuery, ProfileChangeView, SuperuserForm,
        clean_add_form, clean_superuser_form,
    },
    error::{ProfileError, ProfileResult},
    repositories::ProfileFilter,
};

/// Create the router for the profiles service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/admin/profiles", get(changelist).post(add_profile))
        .route("/admin/profiles/superusers", post(add_superuser))
        .route("/admin/profiles/:id", get(change_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
///
/// Answers 503 with a `degraded` status while the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = match state.profiles.ping().await {
        Ok(up) => up,
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            false
        }
    };

    let (status, health, database) = if database_up {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(json!({
            "status": health,
            "service": "profiles-service",
            "database": database,
        })),
    )
}

/// Profile changelist, searchable and filterable, ordered by email
pub async fn changelist(
    State(state): State<AppState>,
    query: Result<Query<ChangelistQuery>, QueryRejection>,
) -> ProfileResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ProfileError::BadRequest(e.body_text()))?;

    let filter = ProfileFilter::from(query);
    let profiles = state.profiles.search(&filter).await?;

    Ok(Json(Changelist::new(profiles)))
}

/// Single profile grouped by fieldset
pub async fn change_view(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ProfileResult<impl IntoResponse> {
    let Path(id) = id.map_err(|_| ProfileError::NotFound)?;

    let profile = state
        .profiles
        .find_by_id(id)
        .await?
        .ok_or(ProfileError::NotFound)?;

    Ok(Json(ProfileChangeView::from(profile)))
}

/// Admin add form
pub async fn add_profile(
    State(state): State<AppState>,
    form: Result<Json<AddProfileForm>, JsonRejection>,
) -> ProfileResult<impl IntoResponse> {
    let Json(form) = form.map_err(|e| ProfileError::BadRequest(e.body_text()))?;
    let cleaned = clean_add_form(&form)?;

    let profile = state
        .manager
        .create_user(&cleaned.email, Some(&cleaned.password), cleaned.fields)
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileChangeView::from(profile))))
}

/// Create a profile with staff and superuser rights
pub async fn add_superuser(
    State(state): State<AppState>,
    form: Result<Json<SuperuserForm>, JsonRejection>,
) -> ProfileResult<impl IntoResponse> {
    let Json(form) = form.map_err(|e| ProfileError::BadRequest(e.body_text()))?;
    let cleaned = clean_superuser_form(form)?;

    let profile = state
        .manager
        .create_superuser(&cleaned.email, Some(&cleaned.password), cleaned.fields)
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileChangeView::from(profile))))
}
