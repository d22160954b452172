//! Custom extractors for Axum handlers.
//!
//! All of them reject with [`AppError`](crate::AppError) so failures render
//! the standard `ErrorResponse` body.

pub mod caller_id;
pub mod uuid_path;
pub mod validated_json;

pub use caller_id::CallerId;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
