//! In-memory repositories and an authenticated test app for handler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
    middleware::from_fn_with_state,
};
use axum_helpers::{JwtAuth, JwtConfig, jwt_auth_middleware};
use domain_events::{Event, EventRepository, EventResult, EventService, OwnerRepository, router};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryEvents {
    docs: Arc<Mutex<HashMap<Uuid, Event>>>,
    race_next_load: Arc<AtomicBool>,
}

impl InMemoryEvents {
    pub fn get(&self, id: Uuid) -> Option<Event> {
        self.docs.lock().unwrap().get(&id).cloned()
    }

    /// Let another writer land right after the next load.
    pub fn race_next_load(&self) {
        self.race_next_load.store(true, Ordering::SeqCst);
    }

    pub fn put(&self, event: Event) {
        self.docs.lock().unwrap().insert(event.id, event);
    }
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn insert(&self, event: &Event) -> EventResult<()> {
        self.put(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let loaded = self.get(id);
        if self.race_next_load.swap(false, Ordering::SeqCst) {
            if let Some(stored) = self.docs.lock().unwrap().get_mut(&id) {
                stored.version += 1;
            }
        }
        Ok(loaded)
    }

    async fn find_by_owner(&self, owner: Uuid) -> EventResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.owner_user_id == Some(owner))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn replace(&self, event: &Event, expected_version: i64) -> EventResult<bool> {
        let mut docs = self.docs.lock().unwrap();
        match docs.get_mut(&event.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = event.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        Ok(self.docs.lock().unwrap().remove(&id).is_some())
    }
}

/// Users and the event ids they own.
#[derive(Clone, Default)]
pub struct InMemoryOwners {
    users: Arc<Mutex<HashMap<Uuid, HashSet<Uuid>>>>,
}

impl InMemoryOwners {
    pub fn add_user(&self, id: Uuid) {
        self.users.lock().unwrap().entry(id).or_default();
    }

    pub fn events_of(&self, id: Uuid) -> HashSet<Uuid> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl OwnerRepository for InMemoryOwners {
    async fn exists(&self, user_id: Uuid) -> EventResult<bool> {
        Ok(self.users.lock().unwrap().contains_key(&user_id))
    }

    async fn attach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<bool> {
        Ok(match self.users.lock().unwrap().get_mut(&user_id) {
            Some(events) => {
                events.insert(event_id);
                true
            }
            None => false,
        })
    }

    async fn detach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<()> {
        if let Some(events) = self.users.lock().unwrap().get_mut(&user_id) {
            events.remove(&event_id);
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub auth: JwtAuth,
    pub events: InMemoryEvents,
    pub owners: InMemoryOwners,
    /// A registered user
    pub user: Uuid,
}

impl TestApp {
    pub fn new() -> Self {
        let events = InMemoryEvents::default();
        let owners = InMemoryOwners::default();
        let user = Uuid::now_v7();
        owners.add_user(user);

        let auth = JwtAuth::new(
            &JwtConfig::new("handler-test-secret-with-at-least-32-chars").unwrap(),
        );
        let service = EventService::new(events.clone(), owners.clone());
        let router = router(service).layer(from_fn_with_state(auth.clone(), jwt_auth_middleware));

        Self {
            router,
            auth,
            events,
            owners,
            user,
        }
    }

    /// Register another user and return their id.
    pub fn another_user(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.owners.add_user(id);
        id
    }

    pub fn token_for(&self, user: Uuid) -> String {
        self.auth.create_token(user, "tester").unwrap()
    }

    /// Send a request as `user`; `body` of `None` sends no payload.
    pub async fn send_as(
        &self,
        user: Uuid,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", self.token_for(user)));

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        self.send_as(self.user, method, uri, body).await
    }

    /// Create a wedding for the default user and return its id.
    pub async fn create_wedding(&self) -> Uuid {
        let response = self
            .send(
                "POST",
                "/",
                Some(serde_json::json!({
                    "eventType": "חתונה",
                    "groomName": "Avi",
                    "brideName": "Noa",
                    "amountInvited": 250,
                    "selectedDate": "2099-06-01T18:00:00Z",
                    "selectedRegions": ["מרכז"]
                })),
            )
            .await;
        let body: Value = json_body(response.into_body()).await;
        body["event"]["_id"].as_str().unwrap().parse().unwrap()
    }
}

// Helper to parse JSON response body
pub async fn json_body<T: DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
