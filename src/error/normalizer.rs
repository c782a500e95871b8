//! Maps arbitrary failures onto the client-facing error taxonomy.
//!
//! Services wrap each operation with [`Normalize::normalize`]: domain errors
//! they raised themselves pass through untouched, while infrastructure errors
//! (database, pool, configuration) are logged with a context tag and replaced
//! by an `Internal` error carrying a safe, user-facing message.

use crate::error::{AppError, AppResult};

const DEFAULT_MESSAGE: &str = "Internal error";

/// Normalizes `error` for the caller.
///
/// The context tag is always logged. Recognized application errors are
/// returned as-is; anything else becomes `AppError::Internal` with
/// `user_message` (or a generic message when empty) and the original error
/// kept as the source.
pub fn handle_error(user_message: &str, context: &str, error: AppError) -> AppError {
    if is_client_facing(&error) {
        tracing::warn!(context = %context, error = %error, "request failed");
        return error;
    }

    tracing::error!(context = %context, error = ?error, "unexpected failure");

    let message = if user_message.trim().is_empty() {
        DEFAULT_MESSAGE.to_string()
    } else {
        user_message.to_string()
    };

    AppError::Internal {
        message,
        source: anyhow::Error::new(error),
    }
}

fn is_client_facing(error: &AppError) -> bool {
    matches!(
        error,
        AppError::NotFound { .. }
            | AppError::Duplicate { .. }
            | AppError::Conflict { .. }
            | AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. }
            | AppError::Internal { .. }
    )
}

/// Extension for applying [`handle_error`] to a service result.
pub trait Normalize<T> {
    fn normalize(self, user_message: &str, context: &str) -> AppResult<T>;
}

impl<T> Normalize<T> for AppResult<T> {
    fn normalize(self, user_message: &str, context: &str) -> AppResult<T> {
        self.map_err(|error| handle_error(user_message, context, error))
    }
}
