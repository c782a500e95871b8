use async_graphql::{Context, EmptySubscription, Object, Result, Schema};
use uuid::Uuid;
use validator::Validate;

use super::error::IntoGraphql;
use super::types::{
    CreateDebtInput, DebtObject, DebtParticipantObject, ParticipantPaymentObject,
};
use crate::api::dto::{
    AddParticipantRequest, CreateDebtRequest, DEBT_CREATED, DEBT_PAID, DEBT_UPDATED,
    DebtSummaryResponse, UpdateDebtRequest,
};
use crate::error::AppError;
use crate::services::Services;
use crate::utils::money::to_amount;

pub type SplitpaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: Services) -> SplitpaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

fn services<'a>(ctx: &Context<'a>) -> Result<&'a Services> {
    ctx.data::<Services>()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn health(&self) -> &'static str {
        "ok"
    }

    /// Debts created by the user, newest first.
    async fn list_debts_by_user(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<Vec<DebtObject>> {
        let debts = services(ctx)?
            .debts
            .list_debts_by_user(user_id)
            .await
            .gql()?;
        Ok(debts.into_iter().map(Into::into).collect())
    }

    async fn get_debt_by_id(&self, ctx: &Context<'_>, debt_id: Uuid) -> Result<DebtObject> {
        let debt = services(ctx)?.debts.get_debt_by_id(debt_id).await.gql()?;
        Ok(debt.into())
    }

    /// `{"totalPaid": .., "totalPending": ..}` serialized as a string.
    async fn debt_summary_by_user(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<String> {
        let summary = services(ctx)?
            .debts
            .debt_summary_by_user(user_id)
            .await
            .gql()?;
        Ok(serde_json::to_string(&DebtSummaryResponse::from(summary))?)
    }

    async fn debt_participants(
        &self,
        ctx: &Context<'_>,
        debt_id: Uuid,
    ) -> Result<Vec<DebtParticipantObject>> {
        let participants = services(ctx)?
            .participants
            .list_participants(debt_id)
            .await
            .gql()?;
        Ok(participants.into_iter().map(Into::into).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_debt(&self, ctx: &Context<'_>, input: CreateDebtInput) -> Result<&'static str> {
        let request = CreateDebtRequest::from(input);
        request.validate().map_err(AppError::from).gql()?;
        services(ctx)?
            .debts
            .create_debt(request.into_input().gql()?)
            .await
            .gql()?;
        Ok(DEBT_CREATED)
    }

    async fn mark_debt_as_paid(&self, ctx: &Context<'_>, debt_id: Uuid) -> Result<&'static str> {
        services(ctx)?.debts.mark_debt_as_paid(debt_id).await.gql()?;
        Ok(DEBT_PAID)
    }

    async fn update_debt(
        &self,
        ctx: &Context<'_>,
        debt_id: Uuid,
        description: Option<String>,
        total_amount: Option<f64>,
    ) -> Result<&'static str> {
        let request = UpdateDebtRequest {
            description,
            total_amount,
        };
        request.validate().map_err(AppError::from).gql()?;
        services(ctx)?
            .debts
            .update_debt(debt_id, request.into_changes().gql()?)
            .await
            .gql()?;
        Ok(DEBT_UPDATED)
    }

    async fn delete_debt(&self, ctx: &Context<'_>, debt_id: Uuid) -> Result<bool> {
        services(ctx)?.debts.delete_debt(debt_id).await.gql()
    }

    async fn add_debt_participant(
        &self,
        ctx: &Context<'_>,
        debt_id: Uuid,
        user_id: Uuid,
        amount: f64,
    ) -> Result<DebtParticipantObject> {
        let request = AddParticipantRequest { user_id, amount };
        request.validate().map_err(AppError::from).gql()?;
        let participant = services(ctx)?
            .participants
            .add_participant(debt_id, request.user_id, to_amount(request.amount).gql()?)
            .await
            .gql()?;
        Ok(participant.into())
    }

    async fn pay_debt_participant(
        &self,
        ctx: &Context<'_>,
        debt_id: Uuid,
        user_id: Uuid,
    ) -> Result<ParticipantPaymentObject> {
        let payment = services(ctx)?
            .participants
            .mark_participant_as_paid(debt_id, user_id)
            .await
            .gql()?;
        Ok(payment.into())
    }
}
