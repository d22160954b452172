//! Event Service - Business logic layer

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{
    AddGuest, CheckListInput, CostInput, CostPatch, CreateEvent, Event, Guest,
    PaymentDeadlineInput, SetPaymentDeadlineCompletion, SetTaskCompletion, UpdateEvent,
};
use crate::repository::{EventRepository, OwnerRepository};
use crate::validation::{
    PHONE_REQUIRED_MESSAGE, build_kind, normalize_regions, require_non_empty,
    validate_amount_invited, validate_event_type, validate_not_past,
};

/// Event service providing the aggregate operations
///
/// Every operation loads the event, checks that the caller owns it, mutates
/// the in-memory copy and writes it back guarded by the version counter.
pub struct EventService<R: EventRepository, O: OwnerRepository> {
    events: Arc<R>,
    owners: Arc<O>,
}

impl<R: EventRepository, O: OwnerRepository> Clone for EventService<R, O> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            owners: Arc::clone(&self.owners),
        }
    }
}

impl<R: EventRepository, O: OwnerRepository> EventService<R, O> {
    pub fn new(events: R, owners: O) -> Self {
        Self {
            events: Arc::new(events),
            owners: Arc::new(owners),
        }
    }

    /// Create an event owned by the caller and link it to their user document
    #[instrument(skip(self, input), fields(event_type = %input.event_type))]
    pub async fn create_event(&self, caller: Uuid, input: CreateEvent) -> EventResult<Event> {
        let now = Utc::now();
        let event_type = validate_event_type(&input.event_type)?;
        let kind = build_kind(
            event_type,
            input.groom_name.as_deref(),
            input.bride_name.as_deref(),
            input.name.as_deref(),
        )?;
        validate_amount_invited(input.amount_invited)?;
        validate_not_past(input.selected_date, now)?;

        if !self.owners.exists(caller).await? {
            return Err(EventError::UserNotFound(caller));
        }

        let mut event = Event {
            id: Uuid::now_v7(),
            kind,
            amount_invited: input.amount_invited,
            event_date: input.selected_date,
            selected_regions: normalize_regions(input.selected_regions),
            photo: None,
            owner_user_id: Some(caller),
            costs: Vec::new(),
            check_lists: Vec::new(),
            guests: Vec::new(),
            payment_deadlines: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        event.add_costs(input.costs)?;
        event.add_check_lists(input.check_lists)?;

        self.events.insert(&event).await?;

        if !self.owners.attach_event(caller, event.id).await? {
            // The user vanished between the check and the link.
            self.events.delete(event.id).await?;
            return Err(EventError::UserNotFound(caller));
        }

        tracing::info!(event_id = %event.id, owner = %caller, "Event created");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, caller: Uuid) -> EventResult<Vec<Event>> {
        if !self.owners.exists(caller).await? {
            return Err(EventError::UserNotFound(caller));
        }
        self.events.find_by_owner(caller).await
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: Uuid, caller: Uuid) -> EventResult<Event> {
        self.load_owned(id, caller).await
    }

    /// Replace names, head count, date and regions. The event type is fixed.
    #[instrument(skip(self, input))]
    pub async fn update_event(
        &self,
        id: Uuid,
        caller: Uuid,
        input: UpdateEvent,
    ) -> EventResult<Event> {
        validate_amount_invited(input.amount_invited)?;
        let now = Utc::now();

        self.mutate(id, caller, move |event| {
            let kind = build_kind(
                event.kind.event_type(),
                input.groom_name.as_deref(),
                input.bride_name.as_deref(),
                input.name.as_deref(),
            )?;
            if input.selected_date != event.event_date {
                validate_not_past(input.selected_date, now)?;
            }

            event.kind = kind;
            event.amount_invited = input.amount_invited;
            event.event_date = input.selected_date;
            event.selected_regions = normalize_regions(input.selected_regions);
            Ok(())
        })
        .await
    }

    /// Delete the event and unlink it from its owner
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid, caller: Uuid) -> EventResult<()> {
        let event = self.load_owned(id, caller).await?;

        if !self.events.delete(id).await? {
            return Err(EventError::EventNotFound(id));
        }
        if let Some(owner) = event.owner_user_id {
            self.owners.detach_event(owner, id).await?;
        }

        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    #[instrument(skip(self, photo_uri))]
    pub async fn set_photo(&self, id: Uuid, caller: Uuid, photo_uri: String) -> EventResult<Event> {
        let photo = require_non_empty("photoUri", Some(&photo_uri))?;
        self.mutate(id, caller, move |event| {
            event.photo = Some(photo);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, costs), fields(count = costs.len()))]
    pub async fn add_costs(
        &self,
        id: Uuid,
        caller: Uuid,
        costs: Vec<CostInput>,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| event.add_costs(costs))
            .await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_cost(
        &self,
        id: Uuid,
        caller: Uuid,
        index: i64,
        patch: CostPatch,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| event.update_cost(index, patch))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_cost(&self, id: Uuid, caller: Uuid, index: i64) -> EventResult<Event> {
        self.mutate(id, caller, move |event| event.delete_cost(index).map(|_| ()))
            .await
    }

    #[instrument(skip(self, lists), fields(count = lists.len()))]
    pub async fn add_check_lists(
        &self,
        id: Uuid,
        caller: Uuid,
        lists: Vec<CheckListInput>,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| event.add_check_lists(lists))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn set_task_completion(
        &self,
        id: Uuid,
        caller: Uuid,
        input: SetTaskCompletion,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| {
            event.set_task_completion(&input.timeframe, &input.label, input.completed)
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn add_guest(&self, id: Uuid, caller: Uuid, input: AddGuest) -> EventResult<Event> {
        self.mutate(id, caller, move |event| {
            event.add_guest(input.name.as_deref(), input.phone.as_deref())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_guests(&self, id: Uuid, caller: Uuid) -> EventResult<Vec<Guest>> {
        let event = self.load_owned(id, caller).await?;
        Ok(event.guests)
    }

    #[instrument(skip(self, phone))]
    pub async fn remove_guest(
        &self,
        id: Uuid,
        caller: Uuid,
        phone: Option<String>,
    ) -> EventResult<Event> {
        let phone = phone
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| EventError::Validation(PHONE_REQUIRED_MESSAGE.to_string()))?;

        self.mutate(id, caller, move |event| {
            event.remove_guest(Some(&phone)).map(|_| ())
        })
        .await
    }

    #[instrument(skip(self, deadlines), fields(count = deadlines.len()))]
    pub async fn add_payment_deadlines(
        &self,
        id: Uuid,
        caller: Uuid,
        deadlines: Vec<PaymentDeadlineInput>,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| event.add_payment_deadlines(deadlines))
            .await
            .map_err(EventError::for_payments)
    }

    #[instrument(skip(self, input))]
    pub async fn set_payment_deadline_completion(
        &self,
        id: Uuid,
        caller: Uuid,
        input: SetPaymentDeadlineCompletion,
    ) -> EventResult<Event> {
        self.mutate(id, caller, move |event| {
            event.set_payment_deadline_completion(
                input.supplier_name.as_deref(),
                input.date,
                input.completed,
            )
        })
        .await
        .map_err(EventError::for_payments)
    }

    async fn load_owned(&self, id: Uuid, caller: Uuid) -> EventResult<Event> {
        let event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or(EventError::EventNotFound(id))?;
        event.ensure_owner(caller)?;
        Ok(event)
    }

    /// Load, check ownership, apply `change`, and write back with a version check.
    ///
    /// If `change` fails nothing is written.
    async fn mutate<F>(&self, id: Uuid, caller: Uuid, change: F) -> EventResult<Event>
    where
        F: FnOnce(&mut Event) -> EventResult<()> + Send,
    {
        let mut event = self.load_owned(id, caller).await?;
        let expected_version = event.version;

        change(&mut event)?;
        event.version = expected_version + 1;
        event.updated_at = Utc::now();

        if !self.events.replace(&event, expected_version).await? {
            return Err(EventError::ConcurrentModification(id));
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, TaskInput};
    use crate::repository::{MockEventRepository, MockOwnerRepository};
    use chrono::Duration;
    use mockall::predicate::eq;

    fn stored_event(owner: Uuid) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::now_v7(),
            kind: EventKind::Wedding {
                groom_name: "Avi".into(),
                bride_name: "Noa".into(),
            },
            amount_invited: 300,
            event_date: Some(now + Duration::days(90)),
            selected_regions: vec![],
            photo: None,
            owner_user_id: Some(owner),
            costs: vec![],
            check_lists: vec![],
            guests: vec![],
            payment_deadlines: vec![],
            version: 3,
            created_at: now,
            updated_at: now,
        }
    }

    fn wedding_input() -> CreateEvent {
        CreateEvent {
            event_type: "חתונה".into(),
            groom_name: Some("Avi".into()),
            bride_name: Some("Noa".into()),
            name: None,
            amount_invited: 250,
            selected_date: Some(Utc::now() + Duration::days(120)),
            selected_regions: vec!["מרכז".into(), "מרכז".into()],
            costs: vec![],
            check_lists: vec![],
        }
    }

    fn returning(event: Event) -> MockEventRepository {
        let mut events = MockEventRepository::new();
        events
            .expect_find_by_id()
            .with(eq(event.id))
            .returning(move |_| Ok(Some(event.clone())));
        events
    }

    #[tokio::test]
    async fn test_create_event_links_owner() {
        let caller = Uuid::now_v7();
        let mut events = MockEventRepository::new();
        let mut owners = MockOwnerRepository::new();

        owners
            .expect_exists()
            .with(eq(caller))
            .times(1)
            .returning(|_| Ok(true));
        events.expect_insert().times(1).returning(|_| Ok(()));
        owners
            .expect_attach_event()
            .withf(move |user, _| *user == caller)
            .times(1)
            .returning(|_, _| Ok(true));

        let service = EventService::new(events, owners);
        let event = service.create_event(caller, wedding_input()).await.unwrap();

        assert_eq!(event.owner_user_id, Some(caller));
        assert_eq!(event.version, 0);
        assert_eq!(event.selected_regions, vec!["מרכז"]);
    }

    #[tokio::test]
    async fn test_create_event_rejects_past_date_before_touching_storage() {
        let service = EventService::new(MockEventRepository::new(), MockOwnerRepository::new());
        let mut input = wedding_input();
        input.selected_date = Some(Utc::now() - Duration::days(1));

        let err = service.create_event(Uuid::now_v7(), input).await.unwrap_err();
        assert_eq!(err.to_string(), "The event date cannot be in the past.");
    }

    #[tokio::test]
    async fn test_create_event_unknown_user() {
        let mut owners = MockOwnerRepository::new();
        owners.expect_exists().returning(|_| Ok(false));

        let service = EventService::new(MockEventRepository::new(), owners);
        let err = service
            .create_event(Uuid::now_v7(), wedding_input())
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_event_with_duplicate_initial_tasks_stores_nothing() {
        let mut owners = MockOwnerRepository::new();
        owners.expect_exists().returning(|_| Ok(true));
        let mut events = MockEventRepository::new();
        events.expect_insert().never();

        let mut input = wedding_input();
        let task = || TaskInput {
            label: Some("Book DJ".into()),
            completed: false,
        };
        input.check_lists = vec![CheckListInput {
            timeframe: Some("חודש לפני".into()),
            tasks: vec![task(), task()],
        }];

        let service = EventService::new(events, owners);
        let err = service
            .create_event(Uuid::now_v7(), input)
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::DuplicateTask { .. }));
    }

    #[tokio::test]
    async fn test_create_event_rolls_back_when_owner_disappears() {
        let mut owners = MockOwnerRepository::new();
        owners.expect_exists().returning(|_| Ok(true));
        owners.expect_attach_event().returning(|_, _| Ok(false));
        let mut events = MockEventRepository::new();
        events.expect_insert().returning(|_| Ok(()));
        events.expect_delete().times(1).returning(|_| Ok(true));

        let service = EventService::new(events, owners);
        let err = service
            .create_event(Uuid::now_v7(), wedding_input())
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_event_forbidden_for_other_user() {
        let event = stored_event(Uuid::now_v7());
        let id = event.id;
        let service = EventService::new(returning(event), MockOwnerRepository::new());

        let err = service.get_event(id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EventError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_mutation_bumps_version_and_passes_expected() {
        let owner = Uuid::now_v7();
        let event = stored_event(owner);
        let id = event.id;
        let mut events = returning(event);
        events
            .expect_replace()
            .withf(|event, expected| *expected == 3 && event.version == 4)
            .times(1)
            .returning(|_, _| Ok(true));

        let service = EventService::new(events, MockOwnerRepository::new());
        let updated = service
            .set_photo(id, owner, "https://cdn.example/p.jpg".into())
            .await
            .unwrap();
        assert_eq!(updated.photo.as_deref(), Some("https://cdn.example/p.jpg"));
        assert_eq!(updated.version, 4);
    }

    #[tokio::test]
    async fn test_stale_write_is_a_conflict() {
        let owner = Uuid::now_v7();
        let event = stored_event(owner);
        let id = event.id;
        let mut events = returning(event);
        events.expect_replace().returning(|_, _| Ok(false));

        let service = EventService::new(events, MockOwnerRepository::new());
        let err = service
            .add_guest(
                id,
                owner,
                AddGuest {
                    name: Some("Dana".into()),
                    phone: Some("0501234567".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::ConcurrentModification(_)));
    }

    #[tokio::test]
    async fn test_failed_batch_never_writes() {
        let owner = Uuid::now_v7();
        let event = stored_event(owner);
        let id = event.id;
        let mut events = returning(event);
        events.expect_replace().never();

        let service = EventService::new(events, MockOwnerRepository::new());
        let costs = vec![
            CostInput {
                label: Some("Venue".into()),
                cost: Some(1.0),
            },
            CostInput {
                label: Some("Venue".into()),
                cost: Some(2.0),
            },
        ];
        let err = service.add_costs(id, owner, costs).await.unwrap_err();
        assert!(matches!(err, EventError::DuplicateCost(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_past_date() {
        let owner = Uuid::now_v7();
        let mut event = stored_event(owner);
        let past = Utc::now() - Duration::days(2);
        event.event_date = Some(past);
        let id = event.id;
        let mut events = returning(event);
        events.expect_replace().returning(|_, _| Ok(true));

        let service = EventService::new(events, MockOwnerRepository::new());
        let input = UpdateEvent {
            groom_name: Some("Avi".into()),
            bride_name: Some("Noa".into()),
            name: None,
            amount_invited: 320,
            selected_date: Some(past),
            selected_regions: vec![],
        };
        let updated = service.update_event(id, owner, input).await.unwrap();
        assert_eq!(updated.amount_invited, 320);
    }

    #[tokio::test]
    async fn test_update_rejects_moving_date_into_past() {
        let owner = Uuid::now_v7();
        let event = stored_event(owner);
        let id = event.id;
        let service = EventService::new(returning(event), MockOwnerRepository::new());

        let input = UpdateEvent {
            groom_name: Some("Avi".into()),
            bride_name: Some("Noa".into()),
            name: None,
            amount_invited: 320,
            selected_date: Some(Utc::now() - Duration::days(2)),
            selected_regions: vec![],
        };
        let err = service.update_event(id, owner, input).await.unwrap_err();
        assert!(matches!(err, EventError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_event_detaches_from_owner() {
        let owner = Uuid::now_v7();
        let event = stored_event(owner);
        let id = event.id;
        let mut events = returning(event);
        events
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));
        let mut owners = MockOwnerRepository::new();
        owners
            .expect_detach_event()
            .with(eq(owner), eq(id))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = EventService::new(events, owners);
        service.delete_event(id, owner).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_event_without_owner_is_integrity_error() {
        let mut event = stored_event(Uuid::now_v7());
        event.owner_user_id = None;
        let id = event.id;
        let mut events = returning(event);
        events.expect_delete().never();

        let service = EventService::new(events, MockOwnerRepository::new());
        let err = service.delete_event(id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EventError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_payment_operations_report_missing_event_in_hebrew() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|_| Ok(None));

        let service = EventService::new(events, MockOwnerRepository::new());
        let err = service
            .add_payment_deadlines(Uuid::now_v7(), Uuid::now_v7(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "האירוע לא נמצא");
    }

    #[tokio::test]
    async fn test_list_events_requires_user() {
        let mut owners = MockOwnerRepository::new();
        owners.expect_exists().returning(|_| Ok(false));

        let service = EventService::new(MockEventRepository::new(), owners);
        let err = service.list_events(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found.");
    }

    #[tokio::test]
    async fn test_remove_guest_without_phone_never_loads_event() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().never();

        let service = EventService::new(events, MockOwnerRepository::new());
        for phone in [None, Some("  ".to_string())] {
            let err = service
                .remove_guest(Uuid::now_v7(), Uuid::now_v7(), phone)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), PHONE_REQUIRED_MESSAGE);
        }
    }
}
