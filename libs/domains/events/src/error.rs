use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    EventNotFound(Uuid),

    /// Event lookup failure reported by the payment-deadline operations.
    #[error("האירוע לא נמצא")]
    PaymentEventNotFound(Uuid),

    #[error("User not found.")]
    UserNotFound(Uuid),

    #[error("Not authorized to access this event")]
    Forbidden { event_id: Uuid, caller: Uuid },

    #[error("Event integrity error")]
    Integrity(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Cost with label '{0}' already exists.")]
    DuplicateCost(String),

    #[error("Cost index out of bounds")]
    CostIndexOutOfBounds { index: i64, len: usize },

    #[error("Task \"{label}\" already exists in the timeframe \"{timeframe}\".")]
    DuplicateTask { timeframe: String, label: String },

    #[error("Timeframe not found")]
    TimeframeNotFound(String),

    #[error("Task not found")]
    TaskNotFound { timeframe: String, label: String },

    #[error("Phone number already exists in the guest list")]
    DuplicateGuest(String),

    #[error("Guest not found in the list")]
    GuestNotFound(String),

    #[error("מועד התשלום לספק \"{supplier_name}\" בתאריך \"{}\" כבר קיים", date.to_rfc3339())]
    DuplicatePaymentDeadline {
        supplier_name: String,
        date: DateTime<Utc>,
    },

    #[error("מועד התשלום לא נמצא")]
    PaymentDeadlineNotFound {
        supplier_name: String,
        date: DateTime<Utc>,
    },

    #[error("Event was modified by another request, reload and retry")]
    ConcurrentModification(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl EventError {
    /// Re-label a missing event for the payment-deadline endpoints.
    pub(crate) fn for_payments(self) -> Self {
        match self {
            EventError::EventNotFound(id) => EventError::PaymentEventNotFound(id),
            other => other,
        }
    }
}

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        let message = err.to_string();
        match err {
            EventError::EventNotFound(_)
            | EventError::PaymentEventNotFound(_)
            | EventError::UserNotFound(_)
            | EventError::CostIndexOutOfBounds { .. }
            | EventError::TimeframeNotFound(_)
            | EventError::TaskNotFound { .. }
            | EventError::GuestNotFound(_)
            | EventError::PaymentDeadlineNotFound { .. } => AppError::NotFound(message),
            EventError::Forbidden { .. } => AppError::Forbidden(message),
            EventError::Validation(_) => AppError::BadRequest(message),
            EventError::DuplicateCost(_)
            | EventError::DuplicateTask { .. }
            | EventError::DuplicateGuest(_)
            | EventError::DuplicatePaymentDeadline { .. } => AppError::DuplicateEntry(message),
            EventError::ConcurrentModification(_) => AppError::Conflict(message),
            EventError::Integrity(_) => AppError::InternalServerError(message),
            EventError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        EventError::Database(format!("BSON serialization error: {}", err))
    }
}
