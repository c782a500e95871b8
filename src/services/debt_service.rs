//! Debt lifecycle: creation, edits while pending, settlement, summaries.

use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::error::{AppError, AppResult, Normalize};
use crate::models::{Debt, DebtStatus, DebtSummary, NewDebt, UpdateDebt, now};
use crate::repositories::DebtStore;

#[derive(Debug, Clone)]
pub struct CreateDebt {
    pub description: String,
    pub total_amount: BigDecimal,
    pub created_by_id: Uuid,
}

#[derive(Clone)]
pub struct DebtService {
    debts: Arc<dyn DebtStore>,
}

impl DebtService {
    pub fn new(debts: Arc<dyn DebtStore>) -> Self {
        Self { debts }
    }

    pub async fn create_debt(&self, input: CreateDebt) -> AppResult<Debt> {
        async move {
            if input.total_amount <= BigDecimal::zero() {
                return Err(AppError::bad_request("Total amount must be greater than 0"));
            }

            let debt = self
                .debts
                .create(NewDebt {
                    id: Uuid::new_v4(),
                    description: input.description,
                    total_amount: input.total_amount,
                    created_by_id: input.created_by_id,
                    status: DebtStatus::Pending,
                })
                .await?;
            tracing::info!(debt_id = %debt.id, created_by = %debt.created_by_id, "Debt created");
            Ok(debt)
        }
        .await
        .normalize("Error creating debt", "DebtService::create_debt")
    }

    pub async fn get_debt_by_id(&self, id: Uuid) -> AppResult<Debt> {
        self.load(id)
            .await
            .normalize("Error fetching debt", "DebtService::get_debt_by_id")
    }

    /// Debts created by the user, newest first.
    pub async fn list_debts_by_user(&self, user_id: Uuid) -> AppResult<Vec<Debt>> {
        self.debts
            .list_by_creator(user_id)
            .await
            .normalize("Error listing debts", "DebtService::list_debts_by_user")
    }

    /// Settles the debt and every share still pending on it.
    pub async fn mark_debt_as_paid(&self, id: Uuid) -> AppResult<Debt> {
        async move {
            let debt = self.load(id).await?;
            if debt.status.is_paid() {
                return Err(AppError::bad_request("Debt is already paid"));
            }

            let debt = self.debts.settle(id, now()).await?;
            tracing::info!(debt_id = %id, "Debt marked as paid");
            Ok(debt)
        }
        .await
        .normalize("Error marking debt as paid", "DebtService::mark_debt_as_paid")
    }

    /// Partial update of a pending debt.
    ///
    /// A new total must stay positive; the store checks it still covers what
    /// is already allocated.
    pub async fn update_debt(&self, id: Uuid, changes: UpdateDebt) -> AppResult<Debt> {
        async move {
            let debt = self.load(id).await?;
            if debt.status.is_paid() {
                return Err(AppError::bad_request("A paid debt cannot be modified"));
            }

            if changes
                .total_amount
                .as_ref()
                .is_some_and(|total| *total <= BigDecimal::zero())
            {
                return Err(AppError::bad_request("Total amount must be greater than 0"));
            }

            if changes.is_empty() {
                return Ok(debt);
            }

            self.debts.update(id, changes).await
        }
        .await
        .normalize("Error updating debt", "DebtService::update_debt")
    }

    /// Deletes a pending debt together with its participants.
    pub async fn delete_debt(&self, id: Uuid) -> AppResult<bool> {
        async move {
            let debt = self.load(id).await?;
            if debt.status.is_paid() {
                return Err(AppError::bad_request("A paid debt cannot be deleted"));
            }

            let deleted = self.debts.delete(id).await?;
            tracing::info!(debt_id = %id, "Debt deleted");
            Ok(deleted > 0)
        }
        .await
        .normalize("Error deleting debt", "DebtService::delete_debt")
    }

    /// Totals of the user's debts split by status.
    pub async fn debt_summary_by_user(&self, user_id: Uuid) -> AppResult<DebtSummary> {
        self.debts
            .summarize_by_creator(user_id)
            .await
            .normalize("Error building debt summary", "DebtService::debt_summary_by_user")
    }

    async fn load(&self, id: Uuid) -> AppResult<Debt> {
        self.debts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Debt", "id", id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::test_support::{MemoryStore, RecordingMailer, dec, sample_user};
    use crate::services::Services;

    fn setup() -> (MemoryStore, Services, Uuid) {
        let store = MemoryStore::default();
        let owner = store.insert_user(sample_user("ana@example.com", "ana"));
        let services = store.services(Arc::new(RecordingMailer::default()));
        (store, services, owner.id)
    }

    fn new_debt(owner: Uuid, amount: &str) -> CreateDebt {
        CreateDebt {
            description: "Dinner".to_string(),
            total_amount: dec(amount),
            created_by_id: owner,
        }
    }

    #[tokio::test]
    async fn create_debt_starts_pending() {
        let (_, services, owner) = setup();
        let debt = services
            .debts
            .create_debt(new_debt(owner, "10000"))
            .await
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);
        assert_eq!(debt.total_amount, dec("10000"));
    }

    #[tokio::test]
    async fn create_debt_rejects_non_positive_totals() {
        let (_, services, owner) = setup();
        for amount in ["0", "-5"] {
            let err = services
                .debts
                .create_debt(new_debt(owner, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest { .. }));
        }
    }

    #[tokio::test]
    async fn get_missing_debt_is_not_found() {
        let (_, services, _) = setup();
        let err = services
            .debts
            .get_debt_by_id(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (_, services, owner) = setup();
        let first = services.debts.create_debt(new_debt(owner, "10")).await.unwrap();
        let second = services.debts.create_debt(new_debt(owner, "20")).await.unwrap();

        let listed = services.debts.list_debts_by_user(owner).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
        assert_eq!(ids, [second.id, first.id]);
        assert!(services
            .debts
            .list_debts_by_user(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn mark_paid_settles_pending_participants() {
        let (store, services, owner) = setup();
        let bob = store.insert_user(sample_user("bob@example.com", "bob"));
        let debt = services.debts.create_debt(new_debt(owner, "100")).await.unwrap();
        services
            .participants
            .add_participant(debt.id, bob.id, dec("40"))
            .await
            .unwrap();

        let paid = services.debts.mark_debt_as_paid(debt.id).await.unwrap();
        assert_eq!(paid.status, DebtStatus::Paid);

        let participants = store.participants_of(debt.id);
        assert!(participants.iter().all(|p| p.status == DebtStatus::Paid && p.paid_at.is_some()));

        let err = services.debts.mark_debt_as_paid(debt.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn paid_debts_cannot_change() {
        let (_, services, owner) = setup();
        let debt = services.debts.create_debt(new_debt(owner, "100")).await.unwrap();
        services.debts.mark_debt_as_paid(debt.id).await.unwrap();

        let err = services
            .debts
            .update_debt(
                debt.id,
                UpdateDebt {
                    description: Some("Lunch".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let err = services.debts.delete_debt(debt.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn update_debt_validates_totals() {
        let (store, services, owner) = setup();
        let bob = store.insert_user(sample_user("bob@example.com", "bob"));
        let debt = services.debts.create_debt(new_debt(owner, "100")).await.unwrap();
        services
            .participants
            .add_participant(debt.id, bob.id, dec("60"))
            .await
            .unwrap();

        let err = services
            .debts
            .update_debt(
                debt.id,
                UpdateDebt {
                    total_amount: Some(dec("0")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let err = services
            .debts
            .update_debt(
                debt.id,
                UpdateDebt {
                    total_amount: Some(dec("50")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { ref message } if message.contains("60.00")));

        let updated = services
            .debts
            .update_debt(
                debt.id,
                UpdateDebt {
                    description: Some("Team dinner".to_string()),
                    total_amount: Some(dec("60")),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "Team dinner");
        assert_eq!(updated.total_amount, dec("60"));
    }

    #[tokio::test]
    async fn delete_debt_cascades_participants() {
        let (store, services, owner) = setup();
        let bob = store.insert_user(sample_user("bob@example.com", "bob"));
        let debt = services.debts.create_debt(new_debt(owner, "100")).await.unwrap();
        services
            .participants
            .add_participant(debt.id, bob.id, dec("10"))
            .await
            .unwrap();

        assert!(services.debts.delete_debt(debt.id).await.unwrap());
        assert!(store.debt(debt.id).is_none());
        assert!(store.participants_of(debt.id).is_empty());
    }

    #[tokio::test]
    async fn summary_splits_by_status() {
        let (_, services, owner) = setup();
        let paid = services.debts.create_debt(new_debt(owner, "1000")).await.unwrap();
        services.debts.create_debt(new_debt(owner, "2000")).await.unwrap();
        services.debts.mark_debt_as_paid(paid.id).await.unwrap();

        let summary = services.debts.debt_summary_by_user(owner).await.unwrap();
        assert_eq!(summary.total_paid, dec("1000"));
        assert_eq!(summary.total_pending, dec("2000"));
    }
}
