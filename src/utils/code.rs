//! Random code generation for account verification.

use rand::Rng;

use super::password::PASSWORD_CHARSET;

/// Alphabet of verification codes. Digits appear twice, so they are drawn
/// twice as often as letters.
pub const VERIFICATION_CODE_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ01234567890123456789";

/// Length of the code mailed on registration and on unverified login.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Generates `length` characters drawn uniformly from [`PASSWORD_CHARSET`].
pub fn generate_code(length: usize) -> String {
    sample(PASSWORD_CHARSET.as_bytes(), length)
}

/// Generates `length` characters drawn uniformly from [`VERIFICATION_CODE_CHARSET`].
pub fn generate_random_code(length: usize) -> String {
    sample(VERIFICATION_CODE_CHARSET.as_bytes(), length)
}

/// Generates a code suitable for the verification email.
pub fn generate_verification_code() -> String {
    generate_random_code(VERIFICATION_CODE_LENGTH)
}

fn sample(alphabet: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
