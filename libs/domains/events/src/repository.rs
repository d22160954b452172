//! Storage traits for events and their owners

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::Event;

/// Repository trait for event persistence
///
/// Writes are compare-and-swap on `version`: [`replace`](Self::replace) only
/// succeeds while the stored document still carries `expected_version`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a freshly built event
    async fn insert(&self, event: &Event) -> EventResult<()>;

    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// All events owned by a user, oldest first
    async fn find_by_owner(&self, owner: Uuid) -> EventResult<Vec<Event>>;

    /// Replace the stored document if its version still matches.
    ///
    /// Returns `false` when no document matched (concurrent write or delete).
    async fn replace(&self, event: &Event, expected_version: i64) -> EventResult<bool>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> EventResult<bool>;
}

/// Access to the owning side of the user ↔ event relation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid) -> EventResult<bool>;

    /// Add the event to the user's event list. Returns `false` if the user is gone.
    async fn attach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<bool>;

    async fn detach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<()>;
}
