//! User service for business logic operations.
//!
//! Owns the account rules: lowercase identifiers, unique email and nickname,
//! the password policy, and hashing before anything reaches storage.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult, Normalize};
use crate::models::{NewUser, UpdateUser, User, UserSummary};
use crate::repositories::UserStore;
use crate::utils::code::generate_verification_code;
use crate::utils::password::{hash_password, is_valid_password};

const PASSWORD_POLICY: &str = "Password must be at least 8 characters long and contain an upper case letter, \
     a lower case letter, a digit and a special character";

/// Data for a new account, password in plain text.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
    pub phone: String,
}

/// Partial account update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub code: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserStore>) -> Self {
        Self { repo }
    }

    /// Creates an inactive account with a fresh verification code.
    ///
    /// The returned record still carries the password hash; callers must not
    /// expose it.
    pub async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        async move {
            let email = input.email.trim().to_lowercase();
            let nickname = input.nickname.trim().to_lowercase();

            self.ensure_available(Some(email.as_str()), Some(nickname.as_str()), None)
                .await?;

            if !is_valid_password(&input.password) {
                return Err(AppError::conflict(PASSWORD_POLICY));
            }

            let new_user = NewUser {
                id: Uuid::new_v4(),
                email,
                password: hash_password(&input.password)?,
                nickname,
                name: input.name,
                last_name: input.last_name,
                phone: input.phone,
                code: Some(generate_verification_code()),
                is_active: false,
            };

            let user = self.repo.create(new_user).await?;
            tracing::info!(user_id = %user.id, nickname = %user.nickname, "User created");
            Ok(user)
        }
        .await
        .normalize("Error creating user", "UserService::create_user")
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await
            .and_then(|user| user.ok_or_else(|| AppError::not_found("User", "id", id)))
            .normalize("Error finding user", "UserService::find_by_id")
    }

    /// First user matching the email OR the nickname (both lowercased).
    pub async fn find_one(
        &self,
        email: Option<&str>,
        nickname: Option<&str>,
    ) -> AppResult<Option<User>> {
        let email = email.map(|e| e.trim().to_lowercase());
        let nickname = nickname.map(|n| n.trim().to_lowercase());

        self.repo
            .find_by_email_or_nickname(email.as_deref(), nickname.as_deref(), None)
            .await
            .normalize("Error finding user", "UserService::find_one")
    }

    /// Applies the provided fields, re-checking uniqueness and the password policy.
    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        async move {
            self.repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("User", "id", id))?;

            let email = changes.email.map(|e| e.trim().to_lowercase());
            let nickname = changes.nickname.map(|n| n.trim().to_lowercase());

            self.ensure_available(email.as_deref(), nickname.as_deref(), Some(id))
                .await?;

            let password = match changes.password {
                Some(password) if !is_valid_password(&password) => {
                    return Err(AppError::conflict(PASSWORD_POLICY));
                }
                Some(password) => Some(hash_password(&password)?),
                None => None,
            };

            let update = UpdateUser {
                email,
                password,
                nickname,
                name: changes.name,
                last_name: changes.last_name,
                phone: changes.phone,
                code: changes.code,
                is_active: changes.is_active,
            };

            self.repo.update(id, update).await
        }
        .await
        .normalize("Error updating user", "UserService::update_user")
    }

    /// Active users as `{id, nickname}`, ordered by nickname.
    pub async fn get_users(&self, exclude_id: Option<Uuid>) -> AppResult<Vec<UserSummary>> {
        self.repo
            .list_active(exclude_id)
            .await
            .normalize("Error listing users", "UserService::get_users")
    }

    async fn ensure_available(
        &self,
        email: Option<&str>,
        nickname: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(existing) = self
            .repo
            .find_by_email_or_nickname(email, nickname, exclude_id)
            .await?
        {
            let taken = if email == Some(existing.email.as_str()) {
                "email"
            } else {
                "nickname"
            };
            return Err(AppError::conflict(format!(
                "A user with that {taken} already exists"
            )));
        }
        Ok(())
    }
}
