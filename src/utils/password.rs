use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, phc::PasswordHash},
};

use crate::error::{AppError, AppResult};

/// Special characters a password must draw at least one of.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Every character a password may contain, also the alphabet of [`crate::utils::code::generate_code`].
pub const PASSWORD_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Checks the password policy.
///
/// A valid password has at least 8 characters, one uppercase letter, one
/// lowercase letter, one digit and one of [`PASSWORD_SPECIALS`], and contains
/// nothing outside [`PASSWORD_CHARSET`] (no whitespace, no emoji).
pub fn is_valid_password(password: &str) -> bool {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return false;
    }
    if !password.chars().all(|c| PASSWORD_CHARSET.contains(c)) {
        return false;
    }

    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Hash a password using Argon2id
///
/// # Example
/// ```ignore
/// let hashed = hash_password("Abcdef1!")?;
/// ```
pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes())
        .map_err(|e| AppError::internal("Error hashing password", anyhow::anyhow!("{e}")))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; a malformed hash is an internal error.
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::internal("Stored password hash is malformed", anyhow::anyhow!("{e}")))?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
