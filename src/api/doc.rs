use utoipa::OpenApi;

pub const USER_TAG: &str = "User";
pub const AUTH_TAG: &str = "Auth";
pub const DEBT_TAG: &str = "Debts";
pub const PARTICIPANT_TAG: &str = "Participants";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Splitpay",
        description = "Shared debts, participants and settlement",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::models::DebtStatus,
        )
    ),
    tags(
        (name = USER_TAG, description = "User directory"),
        (name = AUTH_TAG, description = "Registration, verification and login"),
        (name = DEBT_TAG, description = "Debt lifecycle and summaries"),
        (name = PARTICIPANT_TAG, description = "Participants of a debt and their payments"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
