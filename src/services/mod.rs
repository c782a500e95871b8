//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

pub mod auth_service;
pub mod debt_participant_service;
pub mod debt_service;
pub mod email_service;
pub mod user_service;

#[cfg(test)]
pub mod test_support;

pub use auth_service::{AuthService, LoginOutcome, Registration};
pub use debt_participant_service::{DebtParticipantService, ParticipantPayment};
pub use debt_service::{CreateDebt, DebtService};
pub use email_service::{EmailService, Mailer, mailer_from_config};
pub use user_service::{CreateUser, UserChanges, UserService};

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying stores are behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub auth: AuthService,
    pub debts: DebtService,
    pub participants: DebtParticipantService,
}

impl Services {
    /// Wires every service on top of the given repositories.
    pub fn new(repos: Repositories, email: EmailService) -> Self {
        let users = UserService::new(repos.users);
        Self {
            auth: AuthService::new(users.clone(), email),
            users,
            debts: DebtService::new(repos.debts.clone()),
            participants: DebtParticipantService::new(repos.debts, repos.participants),
        }
    }
}
