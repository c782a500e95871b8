//! Data Transfer Objects for API requests and responses.
//!
//! Wire names are camelCase; user payloads never include the password hash.

mod auth;
mod debt;
mod error;
mod health;
mod participant;
mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, ValidateUserRequest};
pub use debt::{
    CreateDebtRequest, DEBT_CREATED, DEBT_PAID, DEBT_UPDATED, DebtResponse, DebtSummaryResponse,
    ListDebtsQuery, MessageResponse, UpdateDebtRequest,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use participant::{
    AddParticipantRequest, ParticipantResponse, ParticipantUserResponse,
    ParticipantWithUserResponse, PaymentResponse,
};
pub use user::{ListUsersQuery, UserResponse, UserSummaryResponse};
