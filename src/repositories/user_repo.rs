//! User repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::UserStore;
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserSummary, now};
use crate::schema::users;

/// User repository holding an async connection pool.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_email_or_nickname(
        &self,
        email: Option<&str>,
        nickname: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        let query = users::table.select(User::as_select()).into_boxed();
        let mut query = match (email, nickname) {
            (Some(e), Some(n)) => query.filter(
                users::email
                    .eq(e.to_string())
                    .or(users::nickname.eq(n.to_string())),
            ),
            (Some(e), None) => query.filter(users::email.eq(e.to_string())),
            (None, Some(n)) => query.filter(users::nickname.eq(n.to_string())),
            (None, None) => return Ok(None),
        };
        if let Some(excluded) = exclude_id {
            query = query.filter(users::id.ne(excluded));
        }

        let mut conn = self.pool.get().await?;
        query.first(&mut conn).await.optional().map_err(AppError::from)
    }

    async fn update(&self, user_id: Uuid, changes: UpdateUser) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::update(users::table.find(user_id))
            .set((&changes, users::updated_at.eq(now())))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::not_found("User", "id", user_id.to_string())
                }
                _ => AppError::from(e),
            })
    }

    async fn list_active(&self, exclude_id: Option<Uuid>) -> AppResult<Vec<UserSummary>> {
        let mut query = users::table
            .filter(users::is_active.eq(true))
            .select(UserSummary::as_select())
            .order(users::nickname.asc())
            .into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(users::id.ne(excluded));
        }

        let mut conn = self.pool.get().await?;
        query.load(&mut conn).await.map_err(AppError::from)
    }
}
