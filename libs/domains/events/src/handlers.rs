use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_helpers::{
    AppError, CallerId, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, DuplicateEntryResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{
    AddCheckLists, AddCosts, AddGuest, AddPaymentDeadlines, CheckList, CheckListInput, Cost,
    CostInput, CostPatch, CreateEvent, Event, EventKind, EventResponse, EventType, EventsResponse,
    Guest, GuestsResponse, MessageResponse, PaymentDeadline, PaymentDeadlineInput, RemoveGuest,
    SetPaymentDeadlineCompletion, SetPhoto, SetTaskCompletion, Task, TaskInput, UpdateEvent,
};
use crate::repository::{EventRepository, OwnerRepository};
use crate::service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        update_event,
        delete_event,
        set_photo,
        add_costs,
        update_cost,
        delete_cost,
        add_check_lists,
        set_task_completion,
        add_guest,
        list_guests,
        remove_guest,
        add_payment_deadlines,
        set_payment_deadline_completion,
    ),
    components(
        schemas(
            Event, EventKind, EventType, Cost, CheckList, Task, Guest, PaymentDeadline,
            CreateEvent, UpdateEvent, SetPhoto, AddCosts, CostInput, CostPatch,
            AddCheckLists, CheckListInput, TaskInput, SetTaskCompletion, AddGuest, RemoveGuest,
            AddPaymentDeadlines, PaymentDeadlineInput, SetPaymentDeadlineCompletion,
            EventResponse, EventsResponse, GuestsResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            ForbiddenResponse,
            UnauthorizedResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            DuplicateEntryResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Event planning: costs, checklists, guests and payment deadlines")
    )
)]
pub struct ApiDoc;

/// Create the events router. Must sit behind `jwt_auth_middleware`.
pub fn router<R, O>(service: EventService<R, O>) -> Router
where
    R: EventRepository + 'static,
    O: OwnerRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/{id}/photo", post(set_photo))
        .route("/{id}/costs", post(add_costs))
        .route("/{id}/costs/{index}", patch(update_cost).delete(delete_cost))
        .route("/{id}/checklists", post(add_check_lists))
        .route("/{id}/checklists/tasks", patch(set_task_completion))
        .route(
            "/{id}/guests",
            get(list_guests).post(add_guest).delete(remove_guest),
        )
        .route(
            "/{id}/payment-deadlines",
            post(add_payment_deadlines).patch(set_payment_deadline_completion),
        )
        .with_state(shared_service)
}

fn event_reply(message: &str, event: Event) -> Json<EventResponse> {
    Json(EventResponse::new(message, event))
}

/// List the caller's events
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    responses(
        (status = 200, description = "Events of the caller", body = EventsResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
) -> EventResult<Json<EventsResponse>> {
    let events = service.list_events(caller).await?;
    Ok(Json(EventsResponse {
        message: "Events retrieved successfully".to_string(),
        events,
    }))
}

/// Create a new event owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created successfully", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let event = service.create_event(caller, input).await?;
    Ok((
        StatusCode::CREATED,
        event_reply("Event created successfully", event),
    ))
}

/// Get one of the caller's events
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
) -> EventResult<Json<EventResponse>> {
    let event = service.get_event(id, caller).await?;
    Ok(event_reply("Event retrieved successfully", event))
}

/// Replace the editable details of an event
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<EventResponse>> {
    let event = service.update_event(id, caller, input).await?;
    Ok(event_reply("Event updated successfully", event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
) -> EventResult<Json<MessageResponse>> {
    service.delete_event(id, caller).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Set the event photo
#[utoipa::path(
    post,
    path = "/{id}/photo",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = SetPhoto,
    responses(
        (status = 200, description = "Photo stored", body = EventResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_photo<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<SetPhoto>,
) -> EventResult<Json<EventResponse>> {
    let event = service.set_photo(id, caller, input.photo_uri).await?;
    Ok(event_reply("Photo URI added successfully", event))
}

/// Append a batch of cost lines; nothing is added if any label clashes
#[utoipa::path(
    post,
    path = "/{id}/costs",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = AddCosts,
    responses(
        (status = 200, description = "Costs added", body = EventResponse),
        (status = 400, response = DuplicateEntryResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_costs<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddCosts>,
) -> EventResult<Json<EventResponse>> {
    let event = service.add_costs(id, caller, input.costs).await?;
    Ok(event_reply("All new costs added successfully", event))
}

/// Update the cost line at a position
#[utoipa::path(
    patch,
    path = "/{id}/costs/{index}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("index" = i64, Path, description = "Zero-based position in the cost list")
    ),
    request_body = CostPatch,
    responses(
        (status = 200, description = "Cost updated", body = EventResponse),
        (status = 400, response = DuplicateEntryResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_cost<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    path: Result<Path<(Uuid, i64)>, PathRejection>,
    ValidatedJson(patch): ValidatedJson<CostPatch>,
) -> Result<Json<EventResponse>, AppError> {
    let Path((id, index)) = path?;
    let event = service.update_cost(id, caller, index, patch).await?;
    Ok(event_reply("Cost updated successfully", event))
}

/// Remove the cost line at a position
#[utoipa::path(
    delete,
    path = "/{id}/costs/{index}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("index" = i64, Path, description = "Zero-based position in the cost list")
    ),
    responses(
        (status = 200, description = "Cost deleted", body = EventResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_cost<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    path: Result<Path<(Uuid, i64)>, PathRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let Path((id, index)) = path?;
    let event = service.delete_cost(id, caller, index).await?;
    Ok(event_reply("Cost deleted successfully", event))
}

/// Add tasks to checklist timeframes
#[utoipa::path(
    post,
    path = "/{id}/checklists",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = AddCheckLists,
    responses(
        (status = 200, description = "Tasks added", body = EventResponse),
        (status = 400, response = DuplicateEntryResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_check_lists<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddCheckLists>,
) -> EventResult<Json<EventResponse>> {
    let event = service.add_check_lists(id, caller, input.check_lists).await?;
    Ok(event_reply("All new Tasks added successfully", event))
}

/// Mark a checklist task done or not done
#[utoipa::path(
    patch,
    path = "/{id}/checklists/tasks",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = SetTaskCompletion,
    responses(
        (status = 200, description = "Task updated", body = EventResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_task_completion<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<SetTaskCompletion>,
) -> EventResult<Json<EventResponse>> {
    let event = service.set_task_completion(id, caller, input).await?;
    Ok(event_reply("Task updated successfully", event))
}

/// Add a guest
#[utoipa::path(
    post,
    path = "/{id}/guests",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = AddGuest,
    responses(
        (status = 200, description = "Guest added", body = EventResponse),
        (status = 400, response = DuplicateEntryResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_guest<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddGuest>,
) -> EventResult<Json<EventResponse>> {
    let event = service.add_guest(id, caller, input).await?;
    Ok(event_reply("Guest added successfully", event))
}

/// List the guests of an event
#[utoipa::path(
    get,
    path = "/{id}/guests",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Guest list", body = GuestsResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn list_guests<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
) -> EventResult<Json<GuestsResponse>> {
    let guests = service.list_guests(id, caller).await?;
    Ok(Json(GuestsResponse {
        message: "Guests retrieved successfully".to_string(),
        guests,
    }))
}

/// Remove a guest by phone number
#[utoipa::path(
    delete,
    path = "/{id}/guests",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RemoveGuest,
    responses(
        (status = 200, description = "Guest removed", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn remove_guest<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<RemoveGuest>,
) -> EventResult<Json<EventResponse>> {
    let event = service.remove_guest(id, caller, input.phone).await?;
    Ok(event_reply("Guest removed successfully", event))
}

/// Add supplier payment deadlines
#[utoipa::path(
    post,
    path = "/{id}/payment-deadlines",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = AddPaymentDeadlines,
    responses(
        (status = 200, description = "Deadlines added", body = EventResponse),
        (status = 400, response = DuplicateEntryResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_payment_deadlines<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddPaymentDeadlines>,
) -> EventResult<Json<EventResponse>> {
    let event = service
        .add_payment_deadlines(id, caller, input.payment_deadlines)
        .await?;
    Ok(event_reply("כל מועדי התשלום החדשים נוספו בהצלחה", event))
}

/// Mark a payment deadline paid or unpaid
#[utoipa::path(
    patch,
    path = "/{id}/payment-deadlines",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = SetPaymentDeadlineCompletion,
    responses(
        (status = 200, description = "Deadline updated", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_payment_deadline_completion<R: EventRepository, O: OwnerRepository>(
    State(service): State<Arc<EventService<R, O>>>,
    CallerId(caller): CallerId,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<SetPaymentDeadlineCompletion>,
) -> EventResult<Json<EventResponse>> {
    let event = service
        .set_payment_deadline_completion(id, caller, input)
        .await?;
    Ok(event_reply("מועד התשלום עודכן בהצלחה", event))
}
