//! Middleware components for request processing.
//!
//! This module contains middleware for logging and request ID tracking,
//! plus the `AppError` to HTTP response conversion.

mod error_handler;
mod logging;
mod request_id;

pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, current_request_id, request_id_middleware};
