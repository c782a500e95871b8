use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use super::DebtStatus;
use crate::error::{AppError, AppResult};

/// Debt query model for SELECT operations
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::debts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Debt {
    pub id: Uuid,
    pub description: String,
    pub total_amount: BigDecimal,
    pub created_by_id: Uuid,
    pub status: DebtStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Debt insert model; debts always start PENDING
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::debts)]
pub struct NewDebt {
    pub id: Uuid,
    pub description: String,
    pub total_amount: BigDecimal,
    pub created_by_id: Uuid,
    pub status: DebtStatus,
}

/// Partial debt update; status is only changed through settlement
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::debts)]
pub struct UpdateDebt {
    pub description: Option<String>,
    pub total_amount: Option<BigDecimal>,
}

impl UpdateDebt {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.total_amount.is_none()
    }

    /// Rejects the change on a settled debt, or when the new total would drop
    /// below what is already `allocated` to participants.
    pub fn check_against(&self, status: DebtStatus, allocated: &BigDecimal) -> AppResult<()> {
        if status.is_paid() {
            return Err(AppError::bad_request("A paid debt cannot be modified"));
        }
        match &self.total_amount {
            Some(total) if total < allocated => Err(AppError::bad_request(format!(
                "Total amount cannot be lower than the amount already assigned to participants ({})",
                allocated.with_scale(2)
            ))),
            _ => Ok(()),
        }
    }
}

/// Totals per status over the debts a user created
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DebtSummary {
    pub total_paid: BigDecimal,
    pub total_pending: BigDecimal,
}

impl DebtSummary {
    /// Folds per-status sums (as produced by a `GROUP BY status`) into a summary.
    pub fn from_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = (DebtStatus, Option<BigDecimal>)>,
    {
        totals
            .into_iter()
            .fold(Self::default(), |mut summary, (status, amount)| {
                let amount = amount.unwrap_or_default();
                match status {
                    DebtStatus::Paid => summary.total_paid += amount,
                    DebtStatus::Pending => summary.total_pending += amount,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn summary_splits_totals_by_status() {
        let summary = DebtSummary::from_totals(vec![
            (DebtStatus::Paid, Some(dec("1000"))),
            (DebtStatus::Pending, Some(dec("2000"))),
        ]);
        assert_eq!(summary.total_paid, dec("1000"));
        assert_eq!(summary.total_pending, dec("2000"));
    }

    #[test]
    fn new_total_cannot_undercut_allocations() {
        let update = UpdateDebt {
            total_amount: Some(dec("50")),
            ..Default::default()
        };
        assert!(update.check_against(DebtStatus::Pending, &dec("50")).is_ok());
        assert!(matches!(
            update.check_against(DebtStatus::Pending, &dec("50.01")),
            Err(AppError::BadRequest { .. })
        ));
        assert!(matches!(
            UpdateDebt::default().check_against(DebtStatus::Paid, &dec("0")),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let summary = DebtSummary::from_totals(Vec::new());
        assert_eq!(summary.total_paid, BigDecimal::from(0));
        assert_eq!(summary.total_pending, BigDecimal::from(0));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateDebt::default().is_empty());
        let update = UpdateDebt {
            description: Some("dinner".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
