//! Events Domain
//!
//! The event aggregate of the planner: a celebration (wedding, henna night or
//! any other event) owned by one user, with its embedded cost list,
//! checklists, guest list and supplier payment deadlines.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Request Flow                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  /api/events/* ─► jwt_auth_middleware ─► handlers (CallerId) │
//! │                                              │               │
//! │                                              ▼               │
//! │                EventService: load ─► ensure_owner ─► mutate  │
//! │                                              │               │
//! │                                              ▼               │
//! │        EventRepository.replace(event, expected_version)      │
//! │                 │                          │                 │
//! │                 ▼                          ▼                 │
//! │         events collection        users collection            │
//! │                                  (OwnerRepository)           │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write replaces the whole document, filtered on `{_id, version}`.
//! A writer holding a stale copy gets a 409 instead of silently overwriting.

pub mod aggregate;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{EventError, EventResult};
pub use handlers::{ApiDoc, router};
pub use models::{
    CheckList, Cost, CreateEvent, Event, EventKind, EventResponse, EventType, EventsResponse,
    Guest, GuestsResponse, MessageResponse, PaymentDeadline, Task, UpdateEvent,
};
pub use mongodb::{MongoEventRepository, MongoOwnerRepository};
pub use repository::{EventRepository, OwnerRepository};
pub use service::EventService;
