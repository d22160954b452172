//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Cloned into each router builder; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the underlying connection pool
    pub mongo_client: Client,
    pub db: Database,
    pub auth: JwtAuth,
}
