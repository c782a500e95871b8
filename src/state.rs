//! Application state for Axum web framework.
//!
//! Shared by the REST handlers and the GraphQL endpoint.

use std::sync::Arc;

use crate::db::AsyncDbPool;
use crate::graphql::{SplitpaySchema, build_schema};
use crate::repositories::Repositories;
use crate::services::{EmailService, Mailer, Services};

/// Application state containing all shared services and resources.
///
/// Cloning is cheap: the services, the pool and the schema are all
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool, used by health checks
    pub db_pool: AsyncDbPool,
    /// Executable GraphQL schema holding its own handle to the services
    pub schema: SplitpaySchema,
}

impl AppState {
    /// Builds repositories over `pool`, then services, then the schema.
    pub fn new(pool: AsyncDbPool, mailer: Arc<dyn Mailer>, support_email: &str) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, EmailService::new(mailer, support_email));
        Self::from_parts(services, pool)
    }

    /// State over already-built services; tests pair in-memory stores with a
    /// lazy pool here.
    pub fn from_parts(services: Services, db_pool: AsyncDbPool) -> Self {
        let schema = build_schema(services.clone());
        Self {
            services,
            db_pool,
            schema,
        }
    }
}
