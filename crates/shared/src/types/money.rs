//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values normalized to two
//! decimal places (minor currency units).

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places amounts are stored with.
pub const CURRENCY_SCALE: u32 = 2;

/// Errors for amount parsing and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The string could not be parsed as a decimal number.
    #[error("invalid amount format: {0}")]
    InvalidFormat(String),

    /// The amount is zero or negative.
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),
}

/// Rounds an amount to the currency scale (half-away-from-zero).
#[must_use]
pub fn normalize_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a user-supplied amount string into a positive, normalized `Decimal`.
///
/// # Errors
///
/// Returns `AmountError::InvalidFormat` for unparseable input and
/// `AmountError::NotPositive` for zero or negative values.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AmountError::InvalidFormat(raw.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }

    Ok(normalize_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", dec!(100.00))]
    #[case("100.5", dec!(100.50))]
    #[case(" 42.25 ", dec!(42.25))]
    #[case("0.005", dec!(0.01))]
    fn test_parse_amount_valid(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("12,50")]
    fn test_parse_amount_invalid_format(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw),
            Err(AmountError::InvalidFormat(_))
        ));
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("-0.01")]
    fn test_parse_amount_not_positive(#[case] raw: &str) {
        assert!(matches!(parse_amount(raw), Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_normalize_rounds_half_away_from_zero() {
        assert_eq!(normalize_amount(dec!(1.005)), dec!(1.01));
        assert_eq!(normalize_amount(dec!(-1.005)), dec!(-1.01));
        assert_eq!(normalize_amount(dec!(2.4)), dec!(2.40));
    }
}
