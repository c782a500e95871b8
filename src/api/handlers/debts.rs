//! Debt handlers.
//!
//! Participant endpoints live under the same `/debts` prefix and are merged in
//! from [`super::participants`].

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use super::participants::participant_routes;
use crate::api::doc::DEBT_TAG;
use crate::api::dto::{
    CreateDebtRequest, DEBT_CREATED, DEBT_PAID, DEBT_UPDATED, DebtResponse, DebtSummaryResponse,
    ErrorResponse, ListDebtsQuery, MessageResponse, UpdateDebtRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ApiPath, ValidatedJson, ValidatedQuery};

/// # Routes
/// - `GET /health` - Module probe
/// - `GET /summary/{userId}` - Totals per status
/// - `POST /` / `GET /?userId=` - Create, list by creator
/// - `GET|PATCH|DELETE /{debtId}` - Read, partial update, delete
/// - `PATCH /{debtId}/paid` - Settle the debt and all its shares
pub fn debt_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(debts_health))
        .routes(routes!(debt_summary))
        .routes(routes!(create_debt, list_debts))
        .routes(routes!(get_debt, update_debt, delete_debt))
        .routes(routes!(mark_debt_paid))
        .merge(participant_routes())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = DEBT_TAG,
    responses((status = 200, description = "Debts module is up", body = String))
)]
async fn debts_health() -> &'static str {
    "ok"
}

#[utoipa::path(
    post,
    path = "/",
    tag = DEBT_TAG,
    request_body = CreateDebtRequest,
    responses(
        (status = 201, description = "Debt created", body = MessageResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse)
    )
)]
async fn create_debt(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDebtRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state.services.debts.create_debt(payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(DEBT_CREATED))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = DEBT_TAG,
    params(ListDebtsQuery),
    responses(
        (status = 200, description = "Debts created by the user, newest first", body = Vec<DebtResponse>),
        (status = 400, description = "Missing or malformed userId", body = ErrorResponse)
    )
)]
async fn list_debts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListDebtsQuery>,
) -> AppResult<Json<Vec<DebtResponse>>> {
    let debts = state.services.debts.list_debts_by_user(query.user_id).await?;
    Ok(Json(debts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{debtId}",
    tag = DEBT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    responses(
        (status = 200, description = "Debt found", body = DebtResponse),
        (status = 404, description = "Debt not found", body = ErrorResponse)
    )
)]
async fn get_debt(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
) -> AppResult<Json<DebtResponse>> {
    let debt = state.services.debts.get_debt_by_id(debt_id).await?;
    Ok(Json(debt.into()))
}

#[utoipa::path(
    patch,
    path = "/{debtId}/paid",
    tag = DEBT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    responses(
        (status = 200, description = "Debt and pending shares marked as paid", body = MessageResponse),
        (status = 400, description = "Debt already paid", body = ErrorResponse),
        (status = 404, description = "Debt not found", body = ErrorResponse)
    )
)]
async fn mark_debt_paid(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.debts.mark_debt_as_paid(debt_id).await?;
    Ok(Json(MessageResponse::new(DEBT_PAID)))
}

#[utoipa::path(
    patch,
    path = "/{debtId}",
    tag = DEBT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    request_body = UpdateDebtRequest,
    responses(
        (status = 200, description = "Debt updated", body = MessageResponse),
        (status = 400, description = "Debt paid or invalid total", body = ErrorResponse),
        (status = 404, description = "Debt not found", body = ErrorResponse)
    )
)]
async fn update_debt(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDebtRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .debts
        .update_debt(debt_id, payload.into_changes()?)
        .await?;
    Ok(Json(MessageResponse::new(DEBT_UPDATED)))
}

#[utoipa::path(
    delete,
    path = "/{debtId}",
    tag = DEBT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    responses(
        (status = 200, description = "Debt deleted with its participants", body = bool),
        (status = 400, description = "Debt already paid", body = ErrorResponse),
        (status = 404, description = "Debt not found", body = ErrorResponse)
    )
)]
async fn delete_debt(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
) -> AppResult<Json<bool>> {
    let deleted = state.services.debts.delete_debt(debt_id).await?;
    Ok(Json(deleted))
}

#[utoipa::path(
    get,
    path = "/summary/{userId}",
    tag = DEBT_TAG,
    params(("userId" = Uuid, Path, description = "Creator of the debts")),
    responses((status = 200, description = "Totals per status", body = DebtSummaryResponse))
)]
async fn debt_summary(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<DebtSummaryResponse>> {
    let summary = state.services.debts.debt_summary_by_user(user_id).await?;
    Ok(Json(summary.into()))
}
