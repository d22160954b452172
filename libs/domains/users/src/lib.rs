//! Users Domain
//!
//! Accounts of the planner: signup with Argon2-hashed passwords, username
//! availability checks and the caller's own profile. Event ownership is
//! recorded on the user document (`events`) by the events domain.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /signup, /verify-username, /me (JWT)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Field validation, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← MongoDB (unique username/email) or in-memory
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, router};
pub use models::{SignupRequest, User, UserProfile, UserResponse, UsernameAvailability};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
