//! Users API routes

use axum::Router;
use domain_users::{MongoUserRepository, UserService};
use tracing::info;

use crate::state::AppState;

/// Signup and username checks are public; `/me` is guarded inside the domain router.
pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(state.db.clone());
    domain_users::router(UserService::new(repository), state.auth.clone())
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db.clone())
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
