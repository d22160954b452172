//! API routes module
//!
//! Wires the domain routers to MongoDB. Everything here is nested under
//! `/api` by `axum_helpers::create_router`.

pub mod events;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .nest("/users", users::router(state))
        .merge(health::router(state.clone()))
}

/// Create the collection indexes both domains rely on.
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    events::init_indexes(db).await?;
    users::init_indexes(db).await?;
    Ok(())
}
