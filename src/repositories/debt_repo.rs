//! Debt repository for async database operations.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use super::DebtStore;
use super::debt_participant_repo::allocated_on;
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Debt, DebtStatus, DebtSummary, NewDebt, UpdateDebt, now};
use crate::schema::{debt_participants, debts};

#[derive(Clone)]
pub struct DebtRepository {
    pool: AsyncDbPool,
}

impl DebtRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn debt_not_found(debt_id: Uuid) -> impl FnOnce(diesel::result::Error) -> AppError {
    move |e| match e {
        diesel::result::Error::NotFound => AppError::not_found("Debt", "id", debt_id),
        _ => AppError::from(e),
    }
}

#[async_trait]
impl DebtStore for DebtRepository {
    async fn create(&self, new_debt: NewDebt) -> AppResult<Debt> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(debts::table)
            .values(&new_debt)
            .returning(Debt::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, debt_id: Uuid) -> AppResult<Option<Debt>> {
        let mut conn = self.pool.get().await?;

        debts::table
            .find(debt_id)
            .select(Debt::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Debt>> {
        let mut conn = self.pool.get().await?;

        debts::table
            .filter(debts::created_by_id.eq(user_id))
            .order(debts::created_at.desc())
            .select(Debt::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, debt_id: Uuid, changes: UpdateDebt) -> AppResult<Debt> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let status: DebtStatus = debts::table
                    .find(debt_id)
                    .select(debts::status)
                    .for_update()
                    .first(conn)
                    .await
                    .map_err(debt_not_found(debt_id))?;

                let allocated = allocated_on(conn, debt_id).await?;
                changes.check_against(status, &allocated)?;

                diesel::update(debts::table.find(debt_id))
                    .set((&changes, debts::updated_at.eq(now())))
                    .returning(Debt::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(debt_not_found(debt_id))
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, debt_id: Uuid) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(debts::table.find(debt_id))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn settle(&self, debt_id: Uuid, paid_at: Timestamp) -> AppResult<Debt> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let flipped = diesel::update(
                    debt_participants::table
                        .filter(debt_participants::debt_id.eq(debt_id))
                        .filter(debt_participants::status.eq(DebtStatus::Pending)),
                )
                .set((
                    debt_participants::status.eq(DebtStatus::Paid),
                    debt_participants::paid_at.eq(Some(paid_at)),
                    debt_participants::updated_at.eq(paid_at),
                ))
                .execute(conn)
                .await?;

                let debt = diesel::update(debts::table.find(debt_id))
                    .set((
                        debts::status.eq(DebtStatus::Paid),
                        debts::updated_at.eq(paid_at),
                    ))
                    .returning(Debt::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(debt_not_found(debt_id))?;

                tracing::debug!(debt_id = %debt_id, participants = flipped, "Debt settled");
                Ok(debt)
            }
            .scope_boxed()
        })
        .await
    }

    async fn summarize_by_creator(&self, user_id: Uuid) -> AppResult<DebtSummary> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<(DebtStatus, Option<BigDecimal>)> = debts::table
            .filter(debts::created_by_id.eq(user_id))
            .group_by(debts::status)
            .select((debts::status, sum(debts::total_amount)))
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(DebtSummary::from_totals(rows))
    }
}
