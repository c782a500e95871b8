//! Registration, email verification and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse,
    ValidateUserRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// # Routes
/// - `POST /register` - Create an inactive account and email its code
/// - `POST /validate` - Activate an account with its code
/// - `POST /login` - Log in by email or nickname
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(validate))
        .routes(routes!(login))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, verification code sent", body = RegisterResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Email or nickname taken, or weak password", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let registration = state.services.auth.register_user(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

#[utoipa::path(
    post,
    path = "/validate",
    tag = AUTH_TAG,
    request_body = ValidateUserRequest,
    responses(
        (status = 200, description = "Account activated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Code does not match", body = ErrorResponse)
    )
)]
async fn validate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ValidateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .auth
        .validate_user(payload.id, &payload.code)
        .await?;
    Ok(Json(user.into()))
}

/// Unverified accounts get a fresh code by email and a "not verified" answer.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, or account not verified yet", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .auth
        .login(&payload.user, &payload.password)
        .await?;
    Ok(Json(outcome.into()))
}
