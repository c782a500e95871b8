use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{DebtParticipant, DebtStatus, ParticipantUser, ParticipantWithUser};
use crate::services::ParticipantPayment;
use crate::utils::money::to_f64;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    pub user_id: Uuid,
    #[validate(range(
        min = 1.0,
        max = 999_999_999_999.99,
        message = "amount must be between 1 and 999999999999.99"
    ))]
    #[schema(example = 40.0, minimum = 1, maximum = 999_999_999_999.99)]
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub debt_id: Uuid,
    pub amount: f64,
    pub status: DebtStatus,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub paid_at: Option<jiff::Timestamp>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::Timestamp,
}

impl From<DebtParticipant> for ParticipantResponse {
    fn from(participant: DebtParticipant) -> Self {
        Self {
            id: participant.id,
            user_id: participant.user_id,
            debt_id: participant.debt_id,
            amount: to_f64(&participant.amount),
            status: participant.status,
            paid_at: participant.paid_at.map(|at| at.to_jiff()),
            created_at: participant.created_at.to_jiff(),
            updated_at: participant.updated_at.to_jiff(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
}

impl From<ParticipantUser> for ParticipantUserResponse {
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

/// Participant row with its user embedded.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantWithUserResponse {
    #[serde(flatten)]
    pub participant: ParticipantResponse,
    pub user: ParticipantUserResponse,
}

impl From<ParticipantWithUser> for ParticipantWithUserResponse {
    fn from(row: ParticipantWithUser) -> Self {
        Self {
            participant: row.participant.into(),
            user: row.user.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[schema(example = "Payment recorded")]
    pub message: String,
    /// True when this payment settled the whole debt
    pub debt_paid: bool,
}

impl From<ParticipantPayment> for PaymentResponse {
    fn from(payment: ParticipantPayment) -> Self {
        Self {
            message: payment.message,
            debt_paid: payment.debt_paid,
        }
    }
}
