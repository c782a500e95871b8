use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::error::{AppError, AppResult, Normalize};
use crate::models::{
    DebtParticipant, DebtStatus, NewDebtParticipant, ParticipantWithUser, PaymentOutcome, now,
};
use crate::repositories::{DebtParticipantStore, DebtStore};

pub const PAYMENT_RECORDED_MESSAGE: &str = "Payment recorded";

/// Result of `mark_participant_as_paid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantPayment {
    pub message: String,
    pub debt_paid: bool,
}

#[derive(Clone)]
pub struct DebtParticipantService {
    debts: Arc<dyn DebtStore>,
    participants: Arc<dyn DebtParticipantStore>,
}

impl DebtParticipantService {
    pub fn new(debts: Arc<dyn DebtStore>, participants: Arc<dyn DebtParticipantStore>) -> Self {
        Self {
            debts,
            participants,
        }
    }

    /// Allocates `amount` of the debt to the user.
    ///
    /// The amount must fit in what is left after the existing shares.
    pub async fn add_participant(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
        amount: BigDecimal,
    ) -> AppResult<DebtParticipant> {
        async move {
            if amount <= BigDecimal::zero() {
                return Err(AppError::bad_request("Amount must be greater than 0"));
            }

            let debt = self
                .debts
                .find_by_id(debt_id)
                .await?
                .ok_or_else(|| AppError::bad_request("Debt does not exist"))?;
            if debt.status.is_paid() {
                return Err(AppError::conflict("Cannot add participants to a paid debt"));
            }

            if self.participants.find(debt_id, user_id).await?.is_some() {
                return Err(AppError::conflict("User is already a participant of this debt"));
            }

            let participant = NewDebtParticipant {
                id: Uuid::new_v4(),
                user_id,
                debt_id,
                amount,
                status: DebtStatus::Pending,
            };
            let allocated = self.participants.allocated_amount(debt_id).await?;
            participant.check_against(debt.status, &debt.total_amount, &allocated)?;

            let created = self.participants.create(participant).await?;
            tracing::info!(debt_id = %debt_id, user_id = %user_id, amount = %created.amount, "Participant added");
            Ok(created)
        }
        .await
        .normalize("Error adding participant", "DebtParticipantService::add_participant")
    }

    pub async fn list_participants(&self, debt_id: Uuid) -> AppResult<Vec<ParticipantWithUser>> {
        self.participants
            .list_with_users(debt_id)
            .await
            .normalize("Error listing participants", "DebtParticipantService::list_participants")
    }

    /// Records the user's payment. Paying the last pending share settles the debt.
    pub async fn mark_participant_as_paid(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<ParticipantPayment> {
        async move {
            let participant = self
                .participants
                .find(debt_id, user_id)
                .await?
                .ok_or_else(|| AppError::bad_request("Participant does not exist"))?;
            if participant.status.is_paid() {
                return Err(AppError::conflict("Participant has already paid"));
            }

            let PaymentOutcome { debt_paid } =
                self.participants.mark_paid(debt_id, user_id, now()).await?;
            tracing::info!(debt_id = %debt_id, user_id = %user_id, debt_paid, "Participant payment recorded");

            Ok(ParticipantPayment {
                message: PAYMENT_RECORDED_MESSAGE.to_string(),
                debt_paid,
            })
        }
        .await
        .normalize(
            "Error marking participant as paid",
            "DebtParticipantService::mark_participant_as_paid",
        )
    }
}
