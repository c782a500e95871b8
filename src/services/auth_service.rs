//! Registration, email verification and login.

use uuid::Uuid;

use super::email_service::EmailService;
use super::user_service::{CreateUser, UserChanges, UserService};
use crate::error::{AppError, AppResult, Normalize};
use crate::models::User;
use crate::utils::code::generate_verification_code;
use crate::utils::password::verify_password;

pub const REGISTERED_MESSAGE: &str = "User registered, check your email for the verification code";
pub const NOT_VERIFIED_MESSAGE: &str = "User not verified, a new code has been sent";
pub const LOGIN_OK_MESSAGE: &str = "Login ok";

#[derive(Debug, Clone)]
pub struct Registration {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Success(User),
    /// The account is inactive; a fresh code was stored and emailed.
    /// Carries the user as it was before the new code was stored.
    NotVerified(User),
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    email: EmailService,
}

impl AuthService {
    pub fn new(users: UserService, email: EmailService) -> Self {
        Self { users, email }
    }

    /// Errors from `UserService` are already normalized there and pass through
    /// as they are; only failures raised here are normalized again.
    pub async fn register_user(&self, input: CreateUser) -> AppResult<Registration> {
        let user = self.users.create_user(input).await?;
        self.email.send_code(&user).await;
        Ok(Registration {
            message: REGISTERED_MESSAGE.to_string(),
            user,
        })
    }

    /// Activates the account when `code` matches the stored one.
    pub async fn validate_user(&self, id: Uuid, code: &str) -> AppResult<User> {
        let user = self.users.find_by_id(id).await?;
        check_code(&user, code).normalize("Error validating user", "AuthService::validate_user")?;

        let user = self
            .users
            .update_user(
                id,
                UserChanges {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(user_id = %user.id, "User verified");
        Ok(user)
    }

    /// `identifier` is matched, lowercased, against email and nickname.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        let identifier = identifier.trim().to_lowercase();
        let found = self
            .users
            .find_one(Some(identifier.as_str()), Some(identifier.as_str()))
            .await?;
        let user = check_credentials(found, &identifier, password)
            .normalize("Error logging in", "AuthService::login")?;

        if !user.is_active {
            let refreshed = self
                .users
                .update_user(
                    user.id,
                    UserChanges {
                        code: Some(generate_verification_code()),
                        ..Default::default()
                    },
                )
                .await?;
            self.email.send_code(&refreshed).await;
            tracing::info!(user_id = %user.id, "Login attempt on unverified account, new code sent");
            return Ok(LoginOutcome::NotVerified(user));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome::Success(user))
    }
}

fn check_code(user: &User, code: &str) -> AppResult<()> {
    if user.code.as_deref() != Some(code.trim()) {
        return Err(AppError::conflict("Invalid verification code"));
    }
    Ok(())
}

fn check_credentials(found: Option<User>, identifier: &str, password: &str) -> AppResult<User> {
    let user = found.ok_or_else(|| AppError::not_found("User", "identifier", identifier))?;
    if !verify_password(password, &user.password)? {
        return Err(AppError::bad_request("Invalid credentials"));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::test_support::{MemoryStore, RecordingMailer, capture_logs};

    fn registration(email: &str, nickname: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "Abcdef1!".to_string(),
            nickname: nickname.to_string(),
            name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            phone: "600 000 000".to_string(),
        }
    }

    fn setup() -> (MemoryStore, Arc<RecordingMailer>, AuthService) {
        let store = MemoryStore::default();
        let mailer = Arc::new(RecordingMailer::default());
        let auth = store.services(mailer.clone()).auth;
        (store, mailer, auth)
    }

    #[tokio::test]
    async fn register_sends_the_code() {
        let (_, mailer, auth) = setup();
        let registration = auth
            .register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap();

        assert_eq!(registration.message, REGISTERED_MESSAGE);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
        assert!(sent[0].body.contains(registration.user.code.as_deref().unwrap()));
    }

    #[tokio::test]
    async fn register_propagates_conflicts() {
        let (_, mailer, auth) = setup();
        auth.register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap();

        let err = auth
            .register_user(registration("ana@example.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_registration_is_logged_once() {
        let (_, _, auth) = setup();
        auth.register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap();

        let (logs, _guard) = capture_logs(tracing::Level::DEBUG);
        auth.register_user(registration("ana@example.com", "other"))
            .await
            .unwrap_err();

        let output = logs.contents();
        assert_eq!(output.matches("request failed").count(), 1, "{output}");
        assert!(output.contains("UserService::create_user"));
    }

    #[tokio::test]
    async fn register_succeeds_when_email_fails() {
        let store = MemoryStore::default();
        let auth = store.services(Arc::new(RecordingMailer::failing())).auth;

        let registration = auth
            .register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap();
        assert!(store.user(registration.user.id).is_some());
    }

    #[tokio::test]
    async fn validate_user_activates_on_matching_code() {
        let (_, _, auth) = setup();
        let user = auth
            .register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap()
            .user;
        let code = user.code.clone().unwrap();

        let err = auth.validate_user(user.id, "WRONG1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let activated = auth.validate_user(user.id, &code).await.unwrap();
        assert!(activated.is_active);

        let err = auth.validate_user(Uuid::new_v4(), &code).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn login_on_inactive_user_sends_new_code() {
        let (store, mailer, auth) = setup();
        let user = auth
            .register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap()
            .user;
        let first_code = user.code.clone().unwrap();

        let outcome = auth.login("ANA", "Abcdef1!").await.unwrap();
        match outcome {
            LoginOutcome::NotVerified(snapshot) => {
                assert_eq!(snapshot.id, user.id);
                assert_eq!(snapshot.code.as_deref(), Some(first_code.as_str()));
            }
            other => panic!("expected NotVerified, got {other:?}"),
        }

        let stored_code = store.user(user.id).unwrap().code.unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].body.contains(&stored_code));
    }

    #[tokio::test]
    async fn login_on_active_user_succeeds() {
        let (_, mailer, auth) = setup();
        let user = auth
            .register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap()
            .user;
        auth.validate_user(user.id, user.code.as_deref().unwrap())
            .await
            .unwrap();

        let outcome = auth.login("Ana@Example.com", "Abcdef1!").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Success(ref u) if u.id == user.id));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let (_, _, auth) = setup();
        auth.register_user(registration("ana@example.com", "ana"))
            .await
            .unwrap();

        let err = auth.login("ana", "Wrong-pass1").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let err = auth.login("nobody", "Abcdef1!").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
