//! GraphQL object and input types.

use async_graphql::{InputObject, SimpleObject};
use uuid::Uuid;

use crate::api::dto::CreateDebtRequest;
use crate::models::{DebtStatus, ParticipantUser, ParticipantWithUser};
use crate::services::ParticipantPayment;
use crate::utils::money::to_f64;

#[derive(Debug, SimpleObject)]
#[graphql(name = "Debt")]
pub struct DebtObject {
    pub id: Uuid,
    pub description: String,
    pub total_amount: f64,
    pub created_by_id: Uuid,
    pub status: DebtStatus,
    /// RFC 3339
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::models::Debt> for DebtObject {
    fn from(debt: crate::models::Debt) -> Self {
        Self {
            id: debt.id,
            description: debt.description,
            total_amount: to_f64(&debt.total_amount),
            created_by_id: debt.created_by_id,
            status: debt.status,
            created_at: debt.created_at.to_jiff().to_string(),
            updated_at: debt.updated_at.to_jiff().to_string(),
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "ParticipantUser")]
pub struct ParticipantUserObject {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
}

impl From<ParticipantUser> for ParticipantUserObject {
    fn from(user: ParticipantUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            name: user.name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "DebtParticipant")]
pub struct DebtParticipantObject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub debt_id: Uuid,
    pub amount: f64,
    pub status: DebtStatus,
    pub paid_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Absent on freshly added participants.
    pub user: Option<ParticipantUserObject>,
}

impl From<crate::models::DebtParticipant> for DebtParticipantObject {
    fn from(participant: crate::models::DebtParticipant) -> Self {
        Self {
            id: participant.id,
            user_id: participant.user_id,
            debt_id: participant.debt_id,
            amount: to_f64(&participant.amount),
            status: participant.status,
            paid_at: participant.paid_at.map(|at| at.to_jiff().to_string()),
            created_at: participant.created_at.to_jiff().to_string(),
            updated_at: participant.updated_at.to_jiff().to_string(),
            user: None,
        }
    }
}

impl From<ParticipantWithUser> for DebtParticipantObject {
    fn from(row: ParticipantWithUser) -> Self {
        Self {
            user: Some(row.user.into()),
            ..row.participant.into()
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct ParticipantPaymentObject {
    pub message: String,
    pub debt_paid: bool,
}

impl From<ParticipantPayment> for ParticipantPaymentObject {
    fn from(payment: ParticipantPayment) -> Self {
        Self {
            message: payment.message,
            debt_paid: payment.debt_paid,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateDebtInput {
    pub description: String,
    pub total_amount: f64,
    pub created_by_id: Uuid,
}

impl From<CreateDebtInput> for CreateDebtRequest {
    fn from(input: CreateDebtInput) -> Self {
        CreateDebtRequest {
            description: input.description,
            total_amount: input.total_amount,
            created_by_id: input.created_by_id,
        }
    }
}
