//! Events API routes
//!
//! Every events endpoint acts on behalf of the authenticated caller, so the
//! whole router sits behind the JWT middleware.

use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use domain_events::{EventService, MongoEventRepository, MongoOwnerRepository};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let events = MongoEventRepository::new(state.db.clone());
    let owners = MongoOwnerRepository::new(state.db.clone());
    let service = EventService::new(events, owners);

    domain_events::router(service).layer(middleware::from_fn_with_state(
        state.auth.clone(),
        jwt_auth_middleware,
    ))
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoEventRepository::new(db.clone())
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
