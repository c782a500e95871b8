//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod auth;
pub mod debts;
pub mod health;
pub mod participants;
pub mod users;
