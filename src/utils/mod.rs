//! Small helpers shared by services and handlers.

pub mod code;
pub mod money;
pub mod password;
pub mod validate;

pub use validate::{ApiPath, ValidatedJson, ValidatedQuery};
