use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// CORS layer for a single allowed origin.
///
/// Allows the methods the API uses (GET, POST, PUT, PATCH, DELETE, OPTIONS),
/// the Content-Type/Authorization/Accept/Cookie headers and credentials,
/// with a one hour preflight cache.
pub fn create_cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Permissive CORS layer, used in development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
