use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Kind of celebration, as it appears in the `eventType` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum EventType {
    #[serde(rename = "חתונה")]
    #[strum(serialize = "חתונה")]
    Wedding,
    #[serde(rename = "חינה")]
    #[strum(serialize = "חינה")]
    Henna,
    #[serde(rename = "אחר")]
    #[strum(serialize = "אחר")]
    Other,
}

/// Type-specific naming of an event.
///
/// Weddings and henna nights name the couple, any other event carries a
/// single free-form name. Flattened into the event document, so the wire
/// shape stays `{"eventType": "חתונה", "groomName": .., "brideName": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "eventType")]
pub enum EventKind {
    #[serde(rename = "חתונה", rename_all = "camelCase")]
    Wedding {
        groom_name: String,
        bride_name: String,
    },
    #[serde(rename = "חינה", rename_all = "camelCase")]
    Henna {
        groom_name: String,
        bride_name: String,
    },
    #[serde(rename = "אחר")]
    Other { name: String },
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Wedding { .. } => EventType::Wedding,
            EventKind::Henna { .. } => EventType::Henna,
            EventKind::Other { .. } => EventType::Other,
        }
    }
}

/// A budget line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cost {
    pub label: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

/// Tasks grouped under a timeframe label such as "חודש לפני".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckList {
    pub timeframe: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A guest, unique per event by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Guest {
    pub name: String,
    pub phone: String,
    pub invited: bool,
}

/// A supplier payment due date, unique per event by (supplierName, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDeadline {
    pub supplier_name: String,
    #[serde(with = "database::mongodb::datetime")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// Event entity - the aggregate stored in the `events` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: EventKind,
    pub amount_invited: i64,
    #[serde(default, with = "database::mongodb::option_datetime")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selected_regions: Vec<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Missing only on corrupted documents
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub check_lists: Vec<CheckList>,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub payment_deadlines: Vec<PaymentDeadline>,
    /// Bumped on every write; stale writers get a conflict
    #[serde(default)]
    pub version: i64,
    #[serde(with = "database::mongodb::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Cost line as submitted by clients; both fields are required.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CostInput {
    pub label: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskInput {
    pub label: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckListInput {
    pub timeframe: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDeadlineInput {
    pub supplier_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// DTO for creating a new event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    /// One of "חתונה", "חינה", "אחר"
    pub event_type: String,
    pub groom_name: Option<String>,
    pub bride_name: Option<String>,
    pub name: Option<String>,
    pub amount_invited: i64,
    pub selected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selected_regions: Vec<String>,
    #[serde(default)]
    pub costs: Vec<CostInput>,
    #[serde(default)]
    pub check_lists: Vec<CheckListInput>,
}

/// DTO for replacing the editable details of an event.
///
/// `selectedDate` is written as-is, so omitting it clears the event date.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub groom_name: Option<String>,
    pub bride_name: Option<String>,
    pub name: Option<String>,
    pub amount_invited: i64,
    pub selected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selected_regions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPhoto {
    #[validate(length(min = 1))]
    pub photo_uri: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddCosts {
    pub costs: Vec<CostInput>,
}

/// Partial cost update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CostPatch {
    pub label: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCheckLists {
    pub check_lists: Vec<CheckListInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetTaskCompletion {
    pub timeframe: String,
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddGuest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RemoveGuest {
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentDeadlines {
    pub payment_deadlines: Vec<PaymentDeadlineInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPaymentDeadlineCompletion {
    pub supplier_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// `{message, event}` envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    pub message: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestsResponse {
    pub message: String,
    pub guests: Vec<Guest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl EventResponse {
    pub fn new(message: impl Into<String>, event: Event) -> Self {
        Self {
            message: message.into(),
            event,
        }
    }
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
