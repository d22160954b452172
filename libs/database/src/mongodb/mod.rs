//! MongoDB connector, health checks and shared BSON encodings.

mod codec;
mod config;
mod connector;
mod health;

pub use codec::{datetime, option_datetime, uuid_to_bson};
pub use config::MongoConfig;
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
