//! Debt participant repository.
//!
//! Allocation and payment both touch the parent debt, so they run inside a
//! transaction: allocation locks the debt row before re-checking its status
//! and capacity, and
//! payment settles the debt in the same transaction once no share is pending.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use super::DebtParticipantStore;
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    DebtParticipant, DebtStatus, NewDebtParticipant, ParticipantUser, ParticipantWithUser,
    PaymentOutcome,
};
use crate::schema::{debt_participants, debts, users};

#[derive(Clone)]
pub struct DebtParticipantRepository {
    pool: AsyncDbPool,
}

impl DebtParticipantRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

pub(super) async fn allocated_on(conn: &mut AsyncPgConnection, debt_id: Uuid) -> QueryResult<BigDecimal> {
    let total: Option<BigDecimal> = debt_participants::table
        .filter(debt_participants::debt_id.eq(debt_id))
        .select(sum(debt_participants::amount))
        .first(conn)
        .await?;
    Ok(total.unwrap_or_default())
}

#[async_trait]
impl DebtParticipantStore for DebtParticipantRepository {
    async fn find(&self, debt_id: Uuid, user_id: Uuid) -> AppResult<Option<DebtParticipant>> {
        let mut conn = self.pool.get().await?;

        debt_participants::table
            .filter(debt_participants::debt_id.eq(debt_id))
            .filter(debt_participants::user_id.eq(user_id))
            .select(DebtParticipant::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn allocated_amount(&self, debt_id: Uuid) -> AppResult<BigDecimal> {
        let mut conn = self.pool.get().await?;
        allocated_on(&mut conn, debt_id).await.map_err(AppError::from)
    }

    async fn create(&self, participant: NewDebtParticipant) -> AppResult<DebtParticipant> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let (total, status): (BigDecimal, DebtStatus) = debts::table
                    .find(participant.debt_id)
                    .select((debts::total_amount, debts::status))
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| AppError::bad_request("Debt does not exist"))?;

                let allocated = allocated_on(conn, participant.debt_id).await?;
                participant.check_against(status, &total, &allocated)?;

                diesel::insert_into(debt_participants::table)
                    .values(&participant)
                    .returning(DebtParticipant::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(AppError::from)
            }
            .scope_boxed()
        })
        .await
    }

    async fn list_with_users(&self, debt_id: Uuid) -> AppResult<Vec<ParticipantWithUser>> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<(DebtParticipant, ParticipantUser)> = debt_participants::table
            .inner_join(users::table)
            .filter(debt_participants::debt_id.eq(debt_id))
            .order(debt_participants::created_at.asc())
            .select((DebtParticipant::as_select(), ParticipantUser::as_select()))
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(participant, user)| ParticipantWithUser { participant, user })
            .collect())
    }

    async fn mark_paid(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
        paid_at: Timestamp,
    ) -> AppResult<PaymentOutcome> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let updated = diesel::update(
                    debt_participants::table
                        .filter(debt_participants::debt_id.eq(debt_id))
                        .filter(debt_participants::user_id.eq(user_id))
                        .filter(debt_participants::status.eq(DebtStatus::Pending)),
                )
                .set((
                    debt_participants::status.eq(DebtStatus::Paid),
                    debt_participants::paid_at.eq(Some(paid_at)),
                    debt_participants::updated_at.eq(paid_at),
                ))
                .execute(conn)
                .await?;

                if updated == 0 {
                    return Err(AppError::conflict("Participant has already paid"));
                }

                let pending: i64 = debt_participants::table
                    .filter(debt_participants::debt_id.eq(debt_id))
                    .filter(debt_participants::status.eq(DebtStatus::Pending))
                    .count()
                    .get_result(conn)
                    .await?;

                if pending > 0 {
                    return Ok(PaymentOutcome { debt_paid: false });
                }

                diesel::update(debts::table.find(debt_id))
                    .set((
                        debts::status.eq(DebtStatus::Paid),
                        debts::updated_at.eq(paid_at),
                    ))
                    .execute(conn)
                    .await?;

                tracing::info!(debt_id = %debt_id, "Last share paid, debt settled");
                Ok(PaymentOutcome { debt_paid: true })
            }
            .scope_boxed()
        })
        .await
    }
}
