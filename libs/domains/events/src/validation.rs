//! Input checks shared by the service and the aggregate.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::{EventError, EventResult};
use crate::models::{EventKind, EventType};

pub const PAST_DATE_MESSAGE: &str = "The event date cannot be in the past.";
pub const EMPTY_TASK_MESSAGE: &str = "Timeframe and task labels must not be empty.";
pub const PHONE_REQUIRED_MESSAGE: &str = "Phone number is required";
pub const PAYMENT_FIELDS_MESSAGE: &str = "שם הספק ותאריך לא יכולים להיות ריקים";

pub fn validate_event_type(raw: &str) -> EventResult<EventType> {
    EventType::from_str(raw.trim())
        .map_err(|_| EventError::Validation(format!("Invalid event type '{}'", raw)))
}

/// Assemble the type-specific naming, requiring the names that type needs.
pub fn build_kind(
    event_type: EventType,
    groom_name: Option<&str>,
    bride_name: Option<&str>,
    name: Option<&str>,
) -> EventResult<EventKind> {
    let kind = match event_type {
        EventType::Wedding => EventKind::Wedding {
            groom_name: require_non_empty("groomName", groom_name)?,
            bride_name: require_non_empty("brideName", bride_name)?,
        },
        EventType::Henna => EventKind::Henna {
            groom_name: require_non_empty("groomName", groom_name)?,
            bride_name: require_non_empty("brideName", bride_name)?,
        },
        EventType::Other => EventKind::Other {
            name: require_non_empty("name", name)?,
        },
    };
    Ok(kind)
}

pub fn validate_amount_invited(amount: i64) -> EventResult<()> {
    if amount <= 0 {
        return Err(EventError::Validation(
            "amountInvited must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Dates strictly before `now` are rejected; no date at all is fine.
pub fn validate_not_past(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> EventResult<()> {
    match date {
        Some(date) if date < now => Err(EventError::Validation(PAST_DATE_MESSAGE.to_string())),
        _ => Ok(()),
    }
}

/// Trimmed, non-empty text or a validation error naming the field.
pub fn require_non_empty(field: &str, value: Option<&str>) -> EventResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(EventError::Validation(format!("{} is required", field))),
    }
}

/// Drop blank and repeated regions, keeping first-seen order.
pub fn normalize_regions(regions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    regions
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty() && seen.insert(r.clone()))
        .collect()
}
