//! Authentication-related Data Transfer Objects

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::UserResponse;
use crate::services::{CreateUser, LoginOutcome, Registration};
use crate::services::auth_service::{LOGIN_OK_MESSAGE, NOT_VERIFIED_MESSAGE};

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s]+$").unwrap());

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "ana@example.com", format = "email")]
    pub email: String,
    /// Plain text; the password policy is enforced by the service
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    #[schema(example = "Abcdef1!", format = "password", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "nickname must not be empty"))]
    #[schema(example = "ana")]
    pub nickname: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "lastName must not be empty"))]
    pub last_name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "phone may only contain digits, spaces, '+' and '-'"))]
    #[schema(example = "+34 600 000 000")]
    pub phone: String,
}

impl From<RegisterRequest> for CreateUser {
    fn from(request: RegisterRequest) -> Self {
        CreateUser {
            email: request.email,
            password: request.password,
            nickname: request.nickname,
            name: request.name,
            last_name: request.last_name,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ValidateUserRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "code must not be empty"))]
    #[schema(example = "AB12CD")]
    pub code: String,
}

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Email or nickname
    #[validate(length(min = 1, message = "user must not be empty"))]
    #[schema(example = "ana")]
    pub user: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    #[schema(format = "password")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

impl From<Registration> for RegisterResponse {
    fn from(registration: Registration) -> Self {
        Self {
            message: registration.message,
            user: registration.user.into(),
        }
    }
}

/// Both shapes are answered with 200; clients tell them apart by their keys.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LoginResponse {
    Success { msg: String, users: UserResponse },
    NotVerified { message: String, user: UserResponse },
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Success(user) => LoginResponse::Success {
                msg: LOGIN_OK_MESSAGE.to_string(),
                users: user.into(),
            },
            LoginOutcome::NotVerified(user) => LoginResponse::NotVerified {
                message: NOT_VERIFIED_MESSAGE.to_string(),
                user: user.into(),
            },
        }
    }
}
