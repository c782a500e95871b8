use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::PARTICIPANT_TAG;
use crate::api::dto::{
    AddParticipantRequest, ErrorResponse, ParticipantResponse, ParticipantWithUserResponse,
    PaymentResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::money::to_amount;
use crate::utils::validate::{ApiPath, ValidatedJson};

pub fn participant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(add_participant, list_participants))
        .routes(routes!(pay_participant))
}

/// POST /debts/{debtId}/participants - Allocate part of the debt to a user
#[utoipa::path(
    post,
    path = "/{debtId}/participants",
    tag = PARTICIPANT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    request_body = AddParticipantRequest,
    responses(
        (status = 201, description = "Participant added", body = ParticipantResponse),
        (status = 400, description = "Invalid amount, unknown debt or amount over the remaining balance", body = ErrorResponse),
        (status = 409, description = "Debt paid or user already participating", body = ErrorResponse)
    )
)]
async fn add_participant(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddParticipantRequest>,
) -> AppResult<(StatusCode, Json<ParticipantResponse>)> {
    let participant = state
        .services
        .participants
        .add_participant(debt_id, payload.user_id, to_amount(payload.amount)?)
        .await?;
    Ok((StatusCode::CREATED, Json(participant.into())))
}

#[utoipa::path(
    get,
    path = "/{debtId}/participants",
    tag = PARTICIPANT_TAG,
    params(("debtId" = Uuid, Path, description = "Debt ID")),
    responses(
        (status = 200, description = "Participants with their users", body = Vec<ParticipantWithUserResponse>)
    )
)]
async fn list_participants(
    State(state): State<AppState>,
    ApiPath(debt_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<ParticipantWithUserResponse>>> {
    let participants = state.services.participants.list_participants(debt_id).await?;
    Ok(Json(participants.into_iter().map(Into::into).collect()))
}

/// PATCH /debts/{debtId}/participants/{userId}/pay - Record a participant's payment
///
/// `debtPaid` is true when this was the last pending share.
#[utoipa::path(
    patch,
    path = "/{debtId}/participants/{userId}/pay",
    tag = PARTICIPANT_TAG,
    params(
        ("debtId" = Uuid, Path, description = "Debt ID"),
        ("userId" = Uuid, Path, description = "Participant's user ID")
    ),
    responses(
        (status = 200, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Participant does not exist", body = ErrorResponse),
        (status = 409, description = "Participant has already paid", body = ErrorResponse)
    )
)]
async fn pay_participant(
    State(state): State<AppState>,
    ApiPath((debt_id, user_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<PaymentResponse>> {
    let payment = state
        .services
        .participants
        .mark_participant_as_paid(debt_id, user_id)
        .await?;
    Ok(Json(payment.into()))
}
