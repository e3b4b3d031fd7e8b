//! Numeric field parsing.
//!
//! Log fields always use a period as the decimal point, independent of
//! locale. Quantities are non-negative 32-bit integers; prices and costs are
//! decimals written in plain (`12`, `12.50`, `.5`) or scientific (`1.2e3`)
//! notation.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when a numeric field cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// The text is not a number of the expected kind.
    #[error("not a number: {0:?}")]
    NotNumeric(String),
    /// A quantity field held a negative integer.
    #[error("negative quantity not allowed: {0}")]
    NegativeQuantity(i32),
}

/// Parse a signed integer, e.g. a discount percentage.
pub fn parse_integer(text: &str) -> Result<i32, NumberError> {
    i32::from_str(text).map_err(|_| NumberError::NotNumeric(text.to_string()))
}

/// Parse a quantity: an integer that must not be negative.
///
/// ```
/// use stockledger_core::{parse_quantity, NumberError};
///
/// assert_eq!(parse_quantity("12"), Ok(12));
/// assert_eq!(parse_quantity("-0"), Ok(0));
/// assert_eq!(parse_quantity("-3"), Err(NumberError::NegativeQuantity(-3)));
/// ```
pub fn parse_quantity(text: &str) -> Result<u32, NumberError> {
    let value = parse_integer(text)?;
    u32::try_from(value).map_err(|_| NumberError::NegativeQuantity(value))
}

/// Parse a decimal price or cost.
///
/// A leading `-` is kept on a zero result (`-0`, `-0.00`), so the value
/// still reports [`Decimal::is_sign_negative`].
pub fn parse_decimal(text: &str) -> Result<Decimal, NumberError> {
    let mut value = parse_decimal_value(text)?;
    if value.is_zero() && text.starts_with('-') {
        value.set_sign_negative(true);
    }
    Ok(value)
}

fn parse_decimal_value(text: &str) -> Result<Decimal, NumberError> {
    let not_numeric = || NumberError::NotNumeric(text.to_string());

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };
    if !is_plain_decimal(mantissa) {
        return Err(not_numeric());
    }
    match exponent {
        None => Decimal::from_str(mantissa).map_err(|_| not_numeric()),
        Some(exp) => {
            if !is_signed_digits(exp) {
                return Err(not_numeric());
            }
            Decimal::from_scientific(text).map_err(|_| not_numeric())
        }
    }
}

/// `[+-]?` digits with at most one `.`, and at least one digit.
fn is_plain_decimal(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut digits = 0;
    let mut points = 0;
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

fn is_signed_digits(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}
