use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity - the document stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; never leaves the service
    pub password: String,
    /// Whether the email address has been confirmed
    #[serde(default)]
    pub confirmed: bool,
    /// Ids of the events this user owns
    #[serde(default)]
    pub events: Vec<Uuid>,
    #[serde(with = "database::mongodb::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unconfirmed user (password must already be hashed)
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password: password_hash,
            confirmed: false,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a user (without the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub confirmed: bool,
    pub events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            confirmed: user.confirmed,
            events: user.events,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating an account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(max = 64))]
    pub username: String,
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 128))]
    pub password: String,
    /// When present it must equal `password`
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyUsernameRequest {
    pub username: String,
}

/// `{message, user}` envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsernameAvailability {
    pub message: String,
    pub available: bool,
}
