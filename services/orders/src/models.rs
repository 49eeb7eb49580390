//! Order and order tag models, request payloads and query parameters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order entity, serialized field-for-field
///
/// `tags` holds the ids of the related order tags in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub start_date: NaiveDate,
    pub embargo_date: NaiveDate,
    pub is_active: bool,
    pub tags: Vec<i64>,
}

/// Order tag entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTag {
    pub id: i64,
    pub name: String,
}

/// Validated order ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub start_date: NaiveDate,
    pub embargo_date: NaiveDate,
    pub is_active: bool,
    pub tags: Vec<i64>,
}

/// Validated order tag ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderTag {
    pub name: String,
}

/// Request body for order creation
///
/// Dates stay raw strings here so every invalid field can be reported at once.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub start_date: Option<String>,
    pub embargo_date: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// Request body for order tag creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderTagRequest {
    pub name: Option<String>,
}

/// Query parameters of the date-range filter
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub embargo_date: Option<String>,
}

/// Inclusive bounds of the date-range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound on `Order::start_date`
    pub start_date: NaiveDate,
    /// Upper bound on `Order::embargo_date`
    pub embargo_date: NaiveDate,
}
