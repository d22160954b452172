use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    CallerId, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    SignupRequest, UserProfile, UserResponse, UsernameAvailability, VerifyUsernameRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(signup, verify_username, me),
    components(
        schemas(SignupRequest, VerifyUsernameRequest, UserProfile, UserResponse, UsernameAvailability),
        responses(
            BadRequestResponse,
            ConflictResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Account signup and profile")
    )
)]
pub struct ApiDoc;

/// Create the users router. `/me` is guarded by the JWT middleware, the rest is public.
pub fn router<R: UserRepository + 'static>(service: UserService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/signup", post(signup))
        .route("/verify-username", post(verify_username))
        .merge(protected)
        .with_state(shared_service)
}

/// Create an account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.signup(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Check whether a username is still available
#[utoipa::path(
    post,
    path = "/verify-username",
    tag = "Users",
    request_body = VerifyUsernameRequest,
    responses(
        (status = 200, description = "Availability of the username", body = UsernameAvailability),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn verify_username<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<VerifyUsernameRequest>,
) -> UserResult<Json<UsernameAvailability>> {
    let available = service.verify_username(&input.username).await?;
    let message = if available {
        "Username is available"
    } else {
        "Username is already taken"
    };
    Ok(Json(UsernameAvailability {
        message: message.to_string(),
        available,
    }))
}

/// Profile of the signed-in user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CallerId(caller): CallerId,
) -> UserResult<Json<UserResponse>> {
    let user = service.me(caller).await?;
    Ok(Json(UserResponse {
        message: "User retrieved successfully".to_string(),
        user,
    }))
}
