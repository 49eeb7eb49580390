//! Input validation for order payloads and filter parameters

use chrono::NaiveDate;

use crate::{
    error::FieldErrors,
    models::{
        CreateOrderRequest, CreateOrderTagRequest, DateRange, DateRangeQuery, NewOrder,
        NewOrderTag,
    },
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TAG_NAME_MAX_LEN: usize = 100;

const REQUIRED: &str = "This field is required.";
const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// Parse a required `YYYY-MM-DD` value
pub fn parse_date(value: Option<&str>) -> Result<NaiveDate, String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(REQUIRED.to_string());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| BAD_DATE.to_string())
}

/// Sort and deduplicate the requested tag ids
pub fn normalize_tag_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Validate the date-range filter; both bounds are required
pub fn validate_date_range(query: &DateRangeQuery) -> Result<DateRange, FieldErrors> {
    let mut errors = FieldErrors::new();

    let start_date = parse_date(query.start_date.as_deref())
        .map_err(|e| errors.insert("start_date".to_string(), vec![e]))
        .ok();
    let embargo_date = parse_date(query.embargo_date.as_deref())
        .map_err(|e| errors.insert("embargo_date".to_string(), vec![e]))
        .ok();

    match (start_date, embargo_date) {
        (Some(start_date), Some(embargo_date)) => Ok(DateRange {
            start_date,
            embargo_date,
        }),
        _ => Err(errors),
    }
}

/// Validate an order creation payload
///
/// `missing_tags` lists requested tag ids that do not exist.
pub fn validate_new_order(
    request: &CreateOrderRequest,
    missing_tags: &[i64],
) -> Result<NewOrder, FieldErrors> {
    let mut errors = FieldErrors::new();

    let start_date = parse_date(request.start_date.as_deref())
        .map_err(|e| errors.insert("start_date".to_string(), vec![e]))
        .ok();
    let embargo_date = parse_date(request.embargo_date.as_deref())
        .map_err(|e| errors.insert("embargo_date".to_string(), vec![e]))
        .ok();

    if !missing_tags.is_empty() {
        let messages = missing_tags
            .iter()
            .map(|id| format!("Invalid pk \"{}\" - object does not exist.", id))
            .collect();
        errors.insert("tags".to_string(), messages);
    }

    match (start_date, embargo_date) {
        (Some(start_date), Some(embargo_date)) if errors.is_empty() => Ok(NewOrder {
            start_date,
            embargo_date,
            is_active: request.is_active.unwrap_or(true),
            tags: normalize_tag_ids(&request.tags),
        }),
        _ => Err(errors),
    }
}

/// Validate an order tag creation payload
pub fn validate_new_order_tag(request: &CreateOrderTagRequest) -> Result<NewOrderTag, FieldErrors> {
    let name = request.name.as_deref().map(str::trim).unwrap_or_default();

    let error = if name.is_empty() {
        REQUIRED.to_string()
    } else if name.chars().count() > TAG_NAME_MAX_LEN {
        format!(
            "Ensure this field has no more than {} characters.",
            TAG_NAME_MAX_LEN
        )
    } else {
        return Ok(NewOrderTag {
            name: name.to_string(),
        });
    };

    Err(FieldErrors::from([("name".to_string(), vec![error])]))
}
