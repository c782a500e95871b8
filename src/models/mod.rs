mod debt;
mod debt_participant;
mod status;
mod user;

pub use debt::{Debt, DebtSummary, NewDebt, UpdateDebt};
pub use debt_participant::{DebtParticipant, NewDebtParticipant, ParticipantWithUser, PaymentOutcome};
pub use status::DebtStatus;
pub use user::{NewUser, ParticipantUser, UpdateUser, User, UserSummary};

use jiff_diesel::ToDiesel;

/// Current instant in the representation diesel binds to `TIMESTAMPTZ`.
pub fn now() -> jiff_diesel::Timestamp {
    jiff::Timestamp::now().to_diesel()
}
