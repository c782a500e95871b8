//! Conversions between wire amounts (`f64`) and stored amounts (`NUMERIC(14,2)`).

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::error::{AppError, AppResult};

/// Decimal places kept for every stored amount.
pub const AMOUNT_SCALE: i64 = 2;

/// Largest amount a `NUMERIC(14,2)` column holds.
pub const MAX_AMOUNT: f64 = 999_999_999_999.99;

/// Converts a client-supplied amount to a decimal rounded to cents.
///
/// Goes through the shortest decimal representation of the float, so `0.1`
/// becomes exactly `0.10` rather than its binary approximation.
pub fn to_amount(value: f64) -> AppResult<BigDecimal> {
    if !value.is_finite() {
        return Err(AppError::bad_request("amount must be a finite number"));
    }
    let decimal = BigDecimal::from_str(&value.to_string())
        .map_err(|_| AppError::bad_request(format!("amount '{value}' is not a valid number")))?;
    let amount = decimal.round(AMOUNT_SCALE);
    if amount > max_amount() {
        return Err(AppError::bad_request(format!(
            "amount must not exceed {MAX_AMOUNT:.2}"
        )));
    }
    Ok(amount)
}

fn max_amount() -> BigDecimal {
    BigDecimal::new(99_999_999_999_999_i64.into(), AMOUNT_SCALE)
}

/// Converts a stored amount back to a wire amount.
pub fn to_f64(amount: &BigDecimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_cents_exact() {
        assert_eq!(to_amount(0.1).unwrap(), BigDecimal::from_str("0.10").unwrap());
        assert_eq!(to_amount(10000.0).unwrap(), BigDecimal::from(10000));
        assert_eq!(to_amount(19.999).unwrap(), BigDecimal::from(20));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(to_amount(f64::NAN), Err(AppError::BadRequest { .. })));
        assert!(matches!(to_amount(f64::INFINITY), Err(AppError::BadRequest { .. })));
    }

    #[test]
    fn rejects_amounts_beyond_the_column() {
        assert_eq!(
            to_amount(MAX_AMOUNT).unwrap(),
            BigDecimal::from_str("999999999999.99").unwrap()
        );
        assert!(matches!(to_amount(1e15), Err(AppError::BadRequest { .. })));
        assert!(matches!(to_amount(1e12), Err(AppError::BadRequest { .. })));
    }

    #[test]
    fn converts_back_to_float() {
        let amount = BigDecimal::from_str("1234.56").unwrap();
        assert_eq!(to_f64(&amount), 1234.56);
    }
}
