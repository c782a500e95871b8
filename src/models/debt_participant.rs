use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use super::{DebtStatus, ParticipantUser};
use crate::error::{AppError, AppResult};

/// A user's allocated share of a debt
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::debt_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DebtParticipant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub debt_id: Uuid,
    pub amount: BigDecimal,
    pub status: DebtStatus,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::debt_participants)]
pub struct NewDebtParticipant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub debt_id: Uuid,
    pub amount: BigDecimal,
    pub status: DebtStatus,
}

impl NewDebtParticipant {
    /// Rejects the share when the debt is settled or when it exceeds what is
    /// left of `total` after `allocated`.
    pub fn check_against(
        &self,
        status: DebtStatus,
        total: &BigDecimal,
        allocated: &BigDecimal,
    ) -> AppResult<()> {
        if status.is_paid() {
            return Err(AppError::conflict("Cannot add participants to a paid debt"));
        }
        let remaining = total - allocated;
        if self.amount > remaining {
            return Err(AppError::bad_request(format!(
                "amount exceeds the remaining balance of the debt (remaining: {})",
                remaining.with_scale(2)
            )));
        }
        Ok(())
    }
}

/// Participant row joined with its user
#[derive(Debug, Clone)]
pub struct ParticipantWithUser {
    pub participant: DebtParticipant,
    pub user: ParticipantUser,
}

/// Outcome of recording a participant's payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// True when this payment settled the last pending share and the debt became PAID.
    pub debt_paid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::dec;

    fn share(amount: &str) -> NewDebtParticipant {
        NewDebtParticipant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            debt_id: Uuid::new_v4(),
            amount: dec(amount),
            status: DebtStatus::Pending,
        }
    }

    #[test]
    fn share_must_fit_the_remaining_balance() {
        let pending = DebtStatus::Pending;
        assert!(share("40").check_against(pending, &dec("100"), &dec("60")).is_ok());
        assert!(matches!(
            share("40.01").check_against(pending, &dec("100"), &dec("60")),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn paid_debt_takes_no_new_shares() {
        assert!(matches!(
            share("1").check_against(DebtStatus::Paid, &dec("100"), &dec("0")),
            Err(AppError::Conflict { .. })
        ));
    }
}
