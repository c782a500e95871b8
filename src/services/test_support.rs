//! In-memory stores and a recording mailer for service and handler tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use super::email_service::{EmailMessage, EmailService, Mailer};
use super::Services;
use crate::error::{AppError, AppResult};
use crate::models::{
    Debt, DebtParticipant, DebtStatus, DebtSummary, NewDebt, NewDebtParticipant, NewUser,
    ParticipantUser, ParticipantWithUser, PaymentOutcome, UpdateDebt, UpdateUser, User,
    UserSummary, now,
};
use crate::repositories::{DebtParticipantStore, DebtStore, Repositories, UserStore};

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

/// Active user with a placeholder password hash.
pub fn sample_user(email: &str, nickname: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password: "not-a-hash".to_string(),
        nickname: nickname.to_string(),
        name: "Ana".to_string(),
        last_name: "Lopez".to_string(),
        phone: "+34 600 000 000".to_string(),
        code: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    debts: Vec<Debt>,
    participants: Vec<DebtParticipant>,
}

/// One shared state behind all three store traits, so cascades behave like
/// the database: deleting a debt drops its participants, settling flips them.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn repositories(&self) -> Repositories {
        Repositories::from_stores(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    pub fn services(&self, mailer: Arc<RecordingMailer>) -> Services {
        Services::new(
            self.repositories(),
            EmailService::new(mailer, "support@example.com"),
        )
    }

    pub fn insert_user(&self, user: User) -> User {
        self.state.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub fn debt(&self, id: Uuid) -> Option<Debt> {
        self.state
            .lock()
            .unwrap()
            .debts
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn participants_of(&self, debt_id: Uuid) -> Vec<DebtParticipant> {
        self.state
            .lock()
            .unwrap()
            .participants
            .iter()
            .filter(|p| p.debt_id == debt_id)
            .cloned()
            .collect()
    }
}

fn allocated(state: &MemoryState, debt_id: Uuid) -> BigDecimal {
    state
        .participants
        .iter()
        .filter(|p| p.debt_id == debt_id)
        .map(|p| p.amount.clone())
        .sum()
}

fn settle_in(state: &mut MemoryState, debt_id: Uuid, paid_at: Timestamp) {
    for participant in state
        .participants
        .iter_mut()
        .filter(|p| p.debt_id == debt_id && p.status == DebtStatus::Pending)
    {
        participant.status = DebtStatus::Paid;
        participant.paid_at = Some(paid_at);
        participant.updated_at = paid_at;
    }
    if let Some(debt) = state.debts.iter_mut().find(|d| d.id == debt_id) {
        debt.status = DebtStatus::Paid;
        debt.updated_at = paid_at;
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.email == new_user.email || u.nickname == new_user.nickname)
        {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_user.email,
            });
        }
        let user = User {
            id: new_user.id,
            email: new_user.email,
            password: new_user.password,
            nickname: new_user.nickname,
            name: new_user.name,
            last_name: new_user.last_name,
            phone: new_user.phone,
            code: new_user.code,
            is_active: new_user.is_active,
            created_at: now(),
            updated_at: now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.user(user_id))
    }

    async fn find_by_email_or_nickname(
        &self,
        email: Option<&str>,
        nickname: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| Some(u.id) != exclude_id)
            .find(|u| email == Some(u.email.as_str()) || nickname == Some(u.nickname.as_str()))
            .cloned())
    }

    async fn update(&self, user_id: Uuid, changes: UpdateUser) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::not_found("User", "id", user_id))?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(nickname) = changes.nickname {
            user.nickname = nickname;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(code) = changes.code {
            user.code = Some(code);
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = now();
        Ok(user.clone())
    }

    async fn list_active(&self, exclude_id: Option<Uuid>) -> AppResult<Vec<UserSummary>> {
        let state = self.state.lock().unwrap();
        let mut users: Vec<UserSummary> = state
            .users
            .iter()
            .filter(|u| u.is_active && Some(u.id) != exclude_id)
            .map(|u| UserSummary {
                id: u.id,
                nickname: u.nickname.clone(),
            })
            .collect();
        users.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(users)
    }
}

#[async_trait]
impl DebtStore for MemoryStore {
    async fn create(&self, new_debt: NewDebt) -> AppResult<Debt> {
        let debt = Debt {
            id: new_debt.id,
            description: new_debt.description,
            total_amount: new_debt.total_amount,
            created_by_id: new_debt.created_by_id,
            status: new_debt.status,
            created_at: now(),
            updated_at: now(),
        };
        self.state.lock().unwrap().debts.push(debt.clone());
        Ok(debt)
    }

    async fn find_by_id(&self, debt_id: Uuid) -> AppResult<Option<Debt>> {
        Ok(self.debt(debt_id))
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Debt>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .debts
            .iter()
            .rev()
            .filter(|d| d.created_by_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, debt_id: Uuid, changes: UpdateDebt) -> AppResult<Debt> {
        let mut state = self.state.lock().unwrap();
        let allocated = allocated(&state, debt_id);
        let debt = state
            .debts
            .iter_mut()
            .find(|d| d.id == debt_id)
            .ok_or_else(|| AppError::not_found("Debt", "id", debt_id))?;
        changes.check_against(debt.status, &allocated)?;
        if let Some(description) = changes.description {
            debt.description = description;
        }
        if let Some(total_amount) = changes.total_amount {
            debt.total_amount = total_amount;
        }
        debt.updated_at = now();
        Ok(debt.clone())
    }

    async fn delete(&self, debt_id: Uuid) -> AppResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.debts.len();
        state.debts.retain(|d| d.id != debt_id);
        state.participants.retain(|p| p.debt_id != debt_id);
        Ok(before - state.debts.len())
    }

    async fn settle(&self, debt_id: Uuid, paid_at: Timestamp) -> AppResult<Debt> {
        let mut state = self.state.lock().unwrap();
        settle_in(&mut state, debt_id, paid_at);
        state
            .debts
            .iter()
            .find(|d| d.id == debt_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Debt", "id", debt_id))
    }

    async fn summarize_by_creator(&self, user_id: Uuid) -> AppResult<DebtSummary> {
        let state = self.state.lock().unwrap();
        Ok(DebtSummary::from_totals(
            state
                .debts
                .iter()
                .filter(|d| d.created_by_id == user_id)
                .map(|d| (d.status, Some(d.total_amount.clone()))),
        ))
    }
}

#[async_trait]
impl DebtParticipantStore for MemoryStore {
    async fn find(&self, debt_id: Uuid, user_id: Uuid) -> AppResult<Option<DebtParticipant>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .participants
            .iter()
            .find(|p| p.debt_id == debt_id && p.user_id == user_id)
            .cloned())
    }

    async fn allocated_amount(&self, debt_id: Uuid) -> AppResult<BigDecimal> {
        Ok(allocated(&self.state.lock().unwrap(), debt_id))
    }

    async fn create(&self, participant: NewDebtParticipant) -> AppResult<DebtParticipant> {
        let mut state = self.state.lock().unwrap();
        let (total, status) = state
            .debts
            .iter()
            .find(|d| d.id == participant.debt_id)
            .map(|d| (d.total_amount.clone(), d.status))
            .ok_or_else(|| AppError::bad_request("Debt does not exist"))?;
        participant.check_against(status, &total, &allocated(&state, participant.debt_id))?;

        if state
            .participants
            .iter()
            .any(|p| p.debt_id == participant.debt_id && p.user_id == participant.user_id)
        {
            return Err(AppError::Duplicate {
                entity: "debt_participants".to_string(),
                field: "user_id".to_string(),
                value: participant.user_id.to_string(),
            });
        }

        let created = DebtParticipant {
            id: participant.id,
            user_id: participant.user_id,
            debt_id: participant.debt_id,
            amount: participant.amount,
            status: participant.status,
            paid_at: None,
            created_at: now(),
            updated_at: now(),
        };
        state.participants.push(created.clone());
        Ok(created)
    }

    async fn list_with_users(&self, debt_id: Uuid) -> AppResult<Vec<ParticipantWithUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .participants
            .iter()
            .filter(|p| p.debt_id == debt_id)
            .filter_map(|p| {
                state
                    .users
                    .iter()
                    .find(|u| u.id == p.user_id)
                    .map(|u| ParticipantWithUser {
                        participant: p.clone(),
                        user: ParticipantUser::from(u),
                    })
            })
            .collect())
    }

    async fn mark_paid(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
        paid_at: Timestamp,
    ) -> AppResult<PaymentOutcome> {
        let mut state = self.state.lock().unwrap();
        let participant = state
            .participants
            .iter_mut()
            .find(|p| {
                p.debt_id == debt_id && p.user_id == user_id && p.status == DebtStatus::Pending
            })
            .ok_or_else(|| AppError::conflict("Participant has already paid"))?;
        participant.status = DebtStatus::Paid;
        participant.paid_at = Some(paid_at);
        participant.updated_at = paid_at;

        let pending = state
            .participants
            .iter()
            .any(|p| p.debt_id == debt_id && p.status == DebtStatus::Pending);
        if pending {
            return Ok(PaymentOutcome { debt_paid: false });
        }

        settle_in(&mut state, debt_id, paid_at);
        Ok(PaymentOutcome { debt_paid: true })
    }
}

/// Mailer that keeps what it was asked to send; optionally fails every send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        if self.fail {
            return Err(AppError::internal(
                "Failed to send email",
                anyhow::anyhow!("connection refused"),
            ));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Formatted log output captured by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Routes events at `level` and above on the current thread into the returned
/// buffer until the guard drops.
pub fn capture_logs(
    level: tracing::Level,
) -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
