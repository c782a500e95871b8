use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

/// User model for reading from database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 hash, never the plain password.
    pub password: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    /// Pending verification code, if any.
    pub code: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub code: Option<String>,
    pub is_active: bool,
}

/// UpdateUser model for partial updates; `None` fields are left untouched
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub code: Option<String>,
    pub is_active: Option<bool>,
}

/// Public projection used by the user directory
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserSummary {
    pub id: Uuid,
    pub nickname: String,
}

/// Projection embedded in participant listings
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParticipantUser {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub last_name: String,
}

impl From<&User> for ParticipantUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}
