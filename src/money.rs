//! Exact decimal amounts for order totals.
//!
//! Prices are held as integer micro-units (six fraction digits), so any sum
//! of generated prices is exact. Rounding to cents happens once, when a
//! total is rendered with [`Amount::to_fixed2`].
//!
//! # Example
//!
//! ```rust
//! use shopify_data::money::Amount;
//!
//! let price: Amount = "12.345".parse().unwrap();
//! assert_eq!(price.to_fixed2(), "12.35");
//!
//! // Summing first and rounding once keeps the half-cents.
//! let total: Amount = [price, price].into_iter().sum();
//! assert_eq!(total.to_fixed2(), "24.69");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use thiserror::Error;

const FRACTION_DIGITS: u32 = 6;
const SCALE: i64 = 1_000_000;
const MICROS_PER_CENT: i64 = SCALE / 100;

/// A decimal string that cannot be represented exactly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Not a plain decimal number.
    #[error("'{0}' is not a decimal amount")]
    Invalid(String),
    /// More fraction digits than the amount can hold.
    #[error("'{0}' has more than 6 fraction digits")]
    TooPrecise(String),
    /// Outside the representable range.
    #[error("'{0}' is out of range")]
    Overflow(String),
}

/// An exact decimal amount of money.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    micros: i64,
}

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self { micros: 0 };

    /// Creates an amount from whole cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self {
            micros: cents.saturating_mul(MICROS_PER_CENT),
        }
    }

    /// Creates an amount from thousandths of a unit (three fraction digits).
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            micros: millis.saturating_mul(1000),
        }
    }

    /// Returns the amount multiplied by a quantity.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self {
            micros: self.micros.saturating_mul(quantity as i64),
        }
    }

    /// Returns the amount in cents, rounded half away from zero.
    #[must_use]
    pub const fn round_to_cents(self) -> i64 {
        let quotient = self.micros / MICROS_PER_CENT;
        let remainder = self.micros % MICROS_PER_CENT;
        if remainder.abs() * 2 >= MICROS_PER_CENT {
            quotient + self.micros.signum()
        } else {
            quotient
        }
    }

    /// Renders the amount with exactly two fraction digits.
    #[must_use]
    pub fn to_fixed2(self) -> String {
        let cents = self.round_to_cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.unsigned_abs();
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            micros: self.micros.saturating_add(rhs.micros),
        }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || MoneyError::Invalid(s.to_string());

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let fraction_len = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        if fraction_len > FRACTION_DIGITS {
            return Err(MoneyError::TooPrecise(s.to_string()));
        }

        let overflow = || MoneyError::Overflow(s.to_string());
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse::<i64>().map_err(|_| invalid())?
                * 10_i64.pow(FRACTION_DIGITS - fraction_len)
        };

        let micros = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(overflow)?;

        Ok(Self {
            micros: if negative { -micros } else { micros },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_render() {
        assert_eq!(amount("12.345").to_fixed2(), "12.35");
        assert_eq!(amount("12.344").to_fixed2(), "12.34");
        assert_eq!(amount("3").to_fixed2(), "3.00");
        assert_eq!(amount("0.5").to_fixed2(), "0.50");
        assert_eq!(amount(".25").to_fixed2(), "0.25");
        assert_eq!(amount("-1.005").to_fixed2(), "-1.01");
        assert_eq!(amount("1499.999").to_fixed2(), "1500.00");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!("".parse::<Amount>(), Err(MoneyError::Invalid(_))));
        assert!(matches!(".".parse::<Amount>(), Err(MoneyError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Amount>(), Err(MoneyError::Invalid(_))));
        assert!(matches!("1e3".parse::<Amount>(), Err(MoneyError::Invalid(_))));
        assert!(matches!("--1".parse::<Amount>(), Err(MoneyError::Invalid(_))));
        assert!(matches!(
            "0.0000001".parse::<Amount>(),
            Err(MoneyError::TooPrecise(_))
        ));
        assert!(matches!(
            "99999999999999999999".parse::<Amount>(),
            Err(MoneyError::Overflow(_))
        ));
    }

    #[test]
    fn test_rounding_happens_once_at_the_total() {
        let price = amount("12.345");
        let rounded_each: i64 = (0..3).map(|_| price.round_to_cents()).sum();
        let total: Amount = std::iter::repeat(price).take(3).sum();

        // 3 x 12.345 = 37.035 -> 37.04, while rounding each line gives 37.05
        assert_eq!(total.to_fixed2(), "37.04");
        assert_eq!(rounded_each, 3705);
    }

    #[test]
    fn test_many_small_prices_sum_exactly() {
        let total: Amount = std::iter::repeat(amount("0.1")).take(1000).sum();
        assert_eq!(total.to_fixed2(), "100.00");

        let total: Amount = std::iter::repeat(amount("0.001")).take(4999).sum();
        assert_eq!(total.to_fixed2(), "5.00");
    }

    #[test]
    fn test_times_and_constructors() {
        assert_eq!(amount("19.999").times(3), amount("59.997"));
        assert_eq!(Amount::from_cents(149), amount("1.49"));
        assert_eq!(Amount::from_millis(12_345), amount("12.345"));
        assert_eq!(Amount::ZERO.times(7), Amount::ZERO);
    }

    #[test]
    fn test_display_matches_fixed2() {
        assert_eq!(amount("6").to_string(), "6.00");
    }
}
