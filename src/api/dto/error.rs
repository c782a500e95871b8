//! Error response DTOs.

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Standard error response format.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "code": "BAD_REQUEST",
    "message": "Total amount must be greater than 0",
    "request_id": "0b6f1c9e-5a43-4c39-9b61-0d8a3c1f2e77"
}))]
pub struct ErrorResponse {
    /// Machine readable error code, e.g. `NOT_FOUND`
    pub code: String,
    pub message: String,
    /// Structured extra information, e.g. the failing fields of a validation error
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_are_omitted() {
        let body = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "missing")).unwrap();
        assert_eq!(body, json!({"code": "NOT_FOUND", "message": "missing"}));
    }

    #[test]
    fn details_and_request_id_are_serialized() {
        let body = ErrorResponse::new("VALIDATION_ERROR", "invalid")
            .with_details(json!([{"field": "email", "message": "bad"}]))
            .with_request_id(Some("req-1".to_string()));
        let body = serde_json::to_value(body).unwrap();
        assert_eq!(body["details"][0]["field"], "email");
        assert_eq!(body["request_id"], "req-1");
    }
}
