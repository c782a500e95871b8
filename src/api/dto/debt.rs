//! Debt DTOs. Amounts travel as JSON numbers and are stored with two decimals.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{Debt, DebtStatus, DebtSummary, UpdateDebt};
use crate::services::CreateDebt;
use crate::utils::money::{to_amount, to_f64};

pub const DEBT_CREATED: &str = "DEBT_CREATED";
pub const DEBT_PAID: &str = "DEBT_PAID";
pub const DEBT_UPDATED: &str = "DEBT_UPDATED";

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "description": "Dinner at Lucia's",
    "totalAmount": 120.5,
    "createdById": "6f1e2d3c-4b5a-6978-8a9b-0c1d2e3f4a5b"
}))]
pub struct CreateDebtRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(range(
        exclusive_min = 0.0,
        max = 999_999_999_999.99,
        message = "totalAmount must be greater than 0 and at most 999999999999.99"
    ))]
    pub total_amount: f64,
    pub created_by_id: Uuid,
}

impl CreateDebtRequest {
    pub fn into_input(self) -> AppResult<CreateDebt> {
        Ok(CreateDebt {
            description: self.description,
            total_amount: to_amount(self.total_amount)?,
            created_by_id: self.created_by_id,
        })
    }
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebtRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(range(
        exclusive_min = 0.0,
        max = 999_999_999_999.99,
        message = "totalAmount must be greater than 0 and at most 999999999999.99"
    ))]
    pub total_amount: Option<f64>,
}

impl UpdateDebtRequest {
    pub fn into_changes(self) -> AppResult<UpdateDebt> {
        Ok(UpdateDebt {
            description: self.description,
            total_amount: self.total_amount.map(to_amount).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListDebtsQuery {
    /// Creator of the debts
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtResponse {
    pub id: Uuid,
    pub description: String,
    #[schema(example = 120.5)]
    pub total_amount: f64,
    pub created_by_id: Uuid,
    pub status: DebtStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::Timestamp,
}

impl From<Debt> for DebtResponse {
    fn from(debt: Debt) -> Self {
        Self {
            id: debt.id,
            description: debt.description,
            total_amount: to_f64(&debt.total_amount),
            created_by_id: debt.created_by_id,
            status: debt.status,
            created_at: debt.created_at.to_jiff(),
            updated_at: debt.updated_at.to_jiff(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummaryResponse {
    pub total_paid: f64,
    pub total_pending: f64,
}

impl From<DebtSummary> for DebtSummaryResponse {
    fn from(summary: DebtSummary) -> Self {
        Self {
            total_paid: to_f64(&summary.total_paid),
            total_pending: to_f64(&summary.total_pending),
        }
    }
}

/// Acknowledgement carrying a fixed status message such as `DEBT_CREATED`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "DEBT_CREATED")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
