//! Converts `AppError` into the JSON `ErrorResponse` returned by every endpoint.
//!
//! Infrastructure failures are reported with a generic message; their details
//! only go to the log.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::request_id::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable machine readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to API clients.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound { entity, .. } => format!("{entity} not found"),
            AppError::Duplicate { entity, field, .. } => {
                format!("A {entity} with that {field} already exists")
            }
            AppError::Conflict { message } | AppError::BadRequest { message } => message.clone(),
            AppError::Validation { field, reason } => format!("{field}: {reason}"),
            AppError::ValidationErrors { .. } => "Request validation failed".to_string(),
            AppError::Database { .. } => "A database error occurred".to_string(),
            AppError::Configuration { .. } => "Server configuration error".to_string(),
            AppError::ConnectionPool { .. } => "Database connection unavailable".to_string(),
            AppError::Internal { message, .. } => message.clone(),
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.code(), self.public_message());
        match self {
            AppError::NotFound { field, value, .. } => {
                response.with_details(json!({ "field": field, "value": value }))
            }
            AppError::Duplicate { field, value, .. } => {
                response.with_details(json!({ "field": field, "value": value }))
            }
            AppError::Validation { field, reason } => {
                response.with_details(json!([{ "field": field, "message": reason }]))
            }
            AppError::ValidationErrors { errors } => response.with_details(json!(errors)),
            _ => response,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = ?self, "Request failed");
        }

        let body = self
            .to_error_response()
            .with_request_id(current_request_id());
        (status, Json(body)).into_response()
    }
}
