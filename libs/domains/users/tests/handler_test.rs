//! Handler tests for the Users domain, over the in-memory repository.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{ErrorResponse, JwtAuth, JwtConfig};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn auth() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new("users-handler-test-secret-32-chars-min").unwrap())
}

fn app(auth: JwtAuth) -> Router {
    router(UserService::new(InMemoryUserRepository::new()), auth)
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn dana() -> Value {
    json!({
        "username": "dana",
        "email": "dana@example.com",
        "password": "correct horse",
        "confirmPassword": "correct horse"
    })
}

#[tokio::test]
async fn test_signup_returns_201_without_password() {
    let app = app(auth());

    let response = app.oneshot(post_json("/signup", dana())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["username"], "dana");
    assert_eq!(body["user"]["confirmed"], false);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_signup_twice_is_conflict() {
    let app = app(auth());

    let first = app.clone().oneshot(post_json("/signup", dana())).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.oneshot(post_json("/signup", dana())).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = json_body(second.into_body()).await;
    assert_eq!(error.error, "CONFLICT");
}

#[tokio::test]
async fn test_signup_with_bad_email_is_400() {
    let app = app(auth());
    let mut body = dana();
    body["email"] = json!("dana-at-example");

    let response = app.oneshot(post_json("/signup", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Invalid email format.");
}

#[tokio::test]
async fn test_verify_username_reports_availability() {
    let app = app(auth());
    app.clone().oneshot(post_json("/signup", dana())).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/verify-username", json!({"username": "dana"})))
        .await
        .unwrap();
    let body: UsernameAvailability = json_body(response.into_body()).await;
    assert!(!body.available);

    let response = app
        .oneshot(post_json("/verify-username", json!({"username": "noa"})))
        .await
        .unwrap();
    let body: UsernameAvailability = json_body(response.into_body()).await;
    assert!(body.available);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = app(auth());
    let request = Request::builder()
        .uri("/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_callers_profile() {
    let auth = auth();
    let app = app(auth.clone());

    let response = app.clone().oneshot(post_json("/signup", dana())).await.unwrap();
    let created: UserResponse = json_body(response.into_body()).await;
    let token = auth.create_token(created.user.id, "dana").unwrap();

    let request = Request::builder()
        .uri("/me")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: UserResponse = json_body(response.into_body()).await;
    assert_eq!(body.user.id, created.user.id);
    assert_eq!(body.user.email, "dana@example.com");
}
