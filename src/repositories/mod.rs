//! Repository layer for data access operations.
//!
//! Each entity has a store trait that services depend on, plus a
//! diesel_async implementation backed by the shared connection pool.

mod debt_participant_repo;
mod debt_repo;
mod user_repo;

use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use jiff_diesel::Timestamp;
use uuid::Uuid;

pub use debt_participant_repo::DebtParticipantRepository;
pub use debt_repo::DebtRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{
    Debt, DebtParticipant, DebtSummary, NewDebt, NewDebtParticipant, NewUser, ParticipantWithUser,
    PaymentOutcome, UpdateDebt, UpdateUser, User, UserSummary,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// First user whose email OR nickname matches, skipping `exclude_id`.
    ///
    /// Returns `None` when both `email` and `nickname` are `None`.
    async fn find_by_email_or_nickname(
        &self,
        email: Option<&str>,
        nickname: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> AppResult<Option<User>>;

    async fn update(&self, user_id: Uuid, changes: UpdateUser) -> AppResult<User>;

    /// Active users ordered by nickname.
    async fn list_active(&self, exclude_id: Option<Uuid>) -> AppResult<Vec<UserSummary>>;
}

#[async_trait]
pub trait DebtStore: Send + Sync {
    async fn create(&self, new_debt: NewDebt) -> AppResult<Debt>;

    async fn find_by_id(&self, debt_id: Uuid) -> AppResult<Option<Debt>>;

    /// Debts created by the user, newest first.
    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Debt>>;

    /// Applies the changes under a lock on the debt row, refusing a paid debt
    /// and a total below the amount already allocated.
    async fn update(&self, debt_id: Uuid, changes: UpdateDebt) -> AppResult<Debt>;

    /// Deletes the debt; participants go with it through the FK cascade.
    async fn delete(&self, debt_id: Uuid) -> AppResult<usize>;

    /// Marks every pending participant and then the debt itself as paid, atomically.
    async fn settle(&self, debt_id: Uuid, paid_at: Timestamp) -> AppResult<Debt>;

    async fn summarize_by_creator(&self, user_id: Uuid) -> AppResult<DebtSummary>;
}

#[async_trait]
pub trait DebtParticipantStore: Send + Sync {
    async fn find(&self, debt_id: Uuid, user_id: Uuid) -> AppResult<Option<DebtParticipant>>;

    /// Sum of the amounts already allocated on the debt (zero when none).
    async fn allocated_amount(&self, debt_id: Uuid) -> AppResult<BigDecimal>;

    /// Inserts the participant after re-checking the status and remaining
    /// capacity of the debt.
    async fn create(&self, participant: NewDebtParticipant) -> AppResult<DebtParticipant>;

    async fn list_with_users(&self, debt_id: Uuid) -> AppResult<Vec<ParticipantWithUser>>;

    /// Marks the share paid; settles the debt when no pending shares remain.
    async fn mark_paid(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
        paid_at: Timestamp,
    ) -> AppResult<PaymentOutcome>;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub debts: Arc<dyn DebtStore>,
    pub participants: Arc<dyn DebtParticipantStore>,
}

impl Repositories {
    /// Creates the diesel-backed repositories sharing one pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            debts: Arc::new(DebtRepository::new(pool.clone())),
            participants: Arc::new(DebtParticipantRepository::new(pool)),
        }
    }

    pub fn from_stores(
        users: Arc<dyn UserStore>,
        debts: Arc<dyn DebtStore>,
        participants: Arc<dyn DebtParticipantStore>,
    ) -> Self {
        Self {
            users,
            debts,
            participants,
        }
    }
}
