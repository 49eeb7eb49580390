//! Orders service routes

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{CreateOrderRequest, CreateOrderTagRequest, DateRangeQuery},
    validation::{
        normalize_tag_ids, validate_date_range, validate_new_order, validate_new_order_tag,
    },
};

/// Where clients land after deactivating an order
pub const ORDER_LIST_PATH: &str = "/orders";

/// Create the router for the orders service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(ORDER_LIST_PATH, get(list_orders).post(create_order))
        .route("/orders/filter", get(filter_orders))
        .route("/orders/:id/deactivate", post(deactivate_order))
        .route("/order-tags", get(list_order_tags).post(create_order_tag))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
///
/// Answers 503 with a `degraded` status while the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = match state.orders.ping().await {
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
            "service": "orders-service",
            "database": database,
        })),
    )
}

/// List all orders
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let orders = state.orders.list().await?;
    Ok(Json(orders))
}

/// Create a new order
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let tags = normalize_tag_ids(&payload.tags);
    let missing_tags = state.order_tags.missing_ids(&tags).await?;
    let new_order = validate_new_order(&payload, &missing_tags)?;

    let order = state.orders.create(&new_order).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders whose dates fall within the requested range
pub async fn filter_orders(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let range = validate_date_range(&query)?;
    let orders = state.orders.filter_by_date_range(&range).await?;

    Ok(Json(orders))
}

/// Deactivate an order and send the client back to the order list
pub async fn deactivate_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    // Non-numeric ids cannot match any order
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    if !state.orders.deactivate(id).await? {
        return Err(ApiError::NotFound);
    }

    info!("Deactivated order {}", id);
    Ok(Redirect::to(ORDER_LIST_PATH))
}

/// List all order tags
pub async fn list_order_tags(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tags = state.order_tags.list().await?;
    Ok(Json(tags))
}

/// Create a new order tag
pub async fn create_order_tag(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderTagRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let new_tag = validate_new_order_tag(&payload)?;

    let tag = state.order_tags.create(&new_tag).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}
