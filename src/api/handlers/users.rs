use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, ListUsersQuery, UserSummaryResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_users))
}

/// GET /users - Active users, ordered by nickname
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Active users", body = Vec<UserSummaryResponse>),
        (status = 400, description = "Malformed excludeId", body = ErrorResponse)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> AppResult<Json<Vec<UserSummaryResponse>>> {
    let users = state.services.users.get_users(query.exclude_id).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
