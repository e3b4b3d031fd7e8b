//! Price keys, money rendering and discount arithmetic.
//!
//! Returns are matched to earlier sales by the nominal sell price rendered
//! with exactly two fraction digits. Prices that render to the same text
//! share a key: `2.004` and `2.001` both become `2.00` and land in the same
//! sale bucket. The sign of the input survives rounding, so `-0.001` keys as
//! `-0.00` and does not collide with `0.00`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A nominal price rendered to exactly two fraction digits.
///
/// # Examples
///
/// ```
/// use stockledger_core::PriceKey;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(PriceKey::from_price(dec!(2.004)), PriceKey::from_price(dec!(2.001)));
/// assert_eq!(PriceKey::from_price(dec!(8)).as_str(), "8.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PriceKey(String);

impl PriceKey {
    /// Build the key for a nominal price.
    #[must_use]
    pub fn from_price(price: Decimal) -> Self {
        Self(format_money(price))
    }

    /// The key text, e.g. `"5.00"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a value with exactly two fraction digits.
///
/// Midpoints round away from zero (`2.005` → `2.01`). A negative value that
/// rounds to zero keeps its sign (`-0.001` → `-0.00`), as does a signed zero.
///
/// The text is built from whole cents, so it has two fraction digits across
/// the full range of [`Decimal`].
#[must_use]
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // scale is at most 2 after rounding; the widened mantissa cannot overflow
    let cents = rounded.mantissa().unsigned_abs() * 10u128.pow(2 - rounded.scale());
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Apply a percentage discount: `base * (1 - percent / 100)`.
///
/// The percentage is not range-checked; a negative percentage raises the
/// price and one above 100 makes it negative. Returns `None` on overflow.
#[must_use]
pub fn apply_discount(base: Decimal, percent: i32) -> Option<Decimal> {
    let fraction = Decimal::from(percent).checked_div(Decimal::ONE_HUNDRED)?;
    base.checked_mul(Decimal::ONE.checked_sub(fraction)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money_pads_fraction() {
        assert_eq!(format_money(dec!(12)), "12.00");
        assert_eq!(format_money(dec!(12.5)), "12.50");
        assert_eq!(format_money(dec!(-4)), "-4.00");
    }

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money(dec!(2.005)), "2.01");
        assert_eq!(format_money(dec!(2.004)), "2.00");
        assert_eq!(format_money(dec!(-2.005)), "-2.01");
    }

    #[test]
    fn test_format_money_keeps_sign_of_small_negatives() {
        assert_eq!(format_money(dec!(-0.001)), "-0.00");
        assert_eq!(format_money(dec!(0.001)), "0.00");
        assert_eq!(format_money(Decimal::ZERO), "0.00");

        let mut negative_zero = Decimal::ZERO;
        negative_zero.set_sign_negative(true);
        assert_eq!(format_money(negative_zero), "-0.00");
    }

    #[test]
    fn test_format_money_near_decimal_max() {
        assert_eq!(format_money(Decimal::MAX), "79228162514264337593543950335.00");
        assert_eq!(format_money(Decimal::MIN), "-79228162514264337593543950335.00");
        assert_eq!(
            format_money(dec!(999999999999999999999999999)),
            "999999999999999999999999999.00"
        );
        assert_eq!(
            format_money(dec!(7922816251426433759354395033.5)),
            "7922816251426433759354395033.50"
        );
    }

    #[test]
    fn test_negative_price_keys_do_not_collide_with_zero() {
        let mut negative_zero = Decimal::ZERO;
        negative_zero.set_sign_negative(true);

        assert_eq!(PriceKey::from_price(negative_zero).as_str(), "-0.00");
        assert_eq!(PriceKey::from_price(dec!(-0.001)), PriceKey::from_price(negative_zero));
        assert_ne!(PriceKey::from_price(negative_zero), PriceKey::from_price(Decimal::ZERO));
        assert_eq!(PriceKey::from_price(dec!(0.004)), PriceKey::from_price(Decimal::ZERO));
    }

    #[test]
    fn test_price_key_collisions() {
        let a = PriceKey::from_price(dec!(2.004));
        let b = PriceKey::from_price(dec!(2.001));
        let c = PriceKey::from_price(dec!(2.0));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_ne!(a, PriceKey::from_price(dec!(2.006)));
    }

    #[test]
    fn test_apply_discount() {
        assert_eq!(apply_discount(dec!(10.00), 50), Some(dec!(5.00)));
        assert_eq!(apply_discount(dec!(10.00), 0), Some(dec!(10.00)));
        assert_eq!(apply_discount(dec!(10.00), -10), Some(dec!(11.00)));
        assert_eq!(apply_discount(dec!(10.00), 150), Some(dec!(-5.00)));
    }
}
