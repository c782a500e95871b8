use async_graphql::{Error, ErrorExtensions};

use crate::error::AppError;

/// Carries the same `code` and HTTP `status` the REST API would answer with.
impl ErrorExtensions for AppError {
    fn extend(&self) -> Error {
        let code = self.code();
        let status = i32::from(self.status_code().as_u16());
        let error = Error::new(self.public_message()).extend_with(|_, ext| {
            ext.set("code", code);
            ext.set("status", status);
        });

        match self {
            AppError::ValidationErrors { errors } => error.extend_with(|_, ext| {
                let fields: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                ext.set("fields", fields);
            }),
            _ => error,
        }
    }
}

/// Shorthand for `Result<T, async_graphql::Error>` built from service results.
pub(crate) trait IntoGraphql<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGraphql<T> for Result<T, AppError> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}
