//! Fixed-point decimal amounts
//!
//! AVAX amounts and KES/AVAX conversion rates are carried as a signed
//! fixed-point decimal with exactly [`SCALE`] fractional digits. The value
//! is stored as an `i128` count of 10^-12 units, so sums are exact and the
//! rendering is stable across the HTTP layer and the database (where the
//! column type is `NUMERIC(38, 12)`).
//!
//! # Example
//!
//! ```
//! use avafund_shared::ledger::amount::{kes_to_avax, Amount};
//!
//! let rate: Amount = "146500".parse().unwrap();
//! let avax = kes_to_avax(1000, rate).unwrap();
//! assert_eq!(avax.to_string(), "0.006825938567");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by [`Amount`]
pub const SCALE: u32 = 12;

const UNIT: i128 = 10i128.pow(SCALE);

/// Error type for amount parsing and arithmetic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Input is not a plain decimal number
    #[error("Invalid decimal amount: {0}")]
    Invalid(String),

    /// Input has more fractional digits than the fixed scale
    #[error("Amount has more than {SCALE} fractional digits: {0}")]
    TooPrecise(String),

    /// Arithmetic left the representable range
    #[error("Amount overflow")]
    Overflow,

    /// Conversion rate must be strictly positive
    #[error("Conversion rate must be greater than zero")]
    NonPositiveRate,
}

/// Fixed-point decimal with 12 fractional digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i128);

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(0);

    /// Builds an amount from raw 10^-12 units
    pub const fn from_units(units: i128) -> Self {
        Self(units)
    }

    /// Builds an amount from a whole number
    pub fn from_whole(value: i64) -> Self {
        Self(i128::from(value) * UNIT)
    }

    /// Raw 10^-12 units
    pub const fn units(&self) -> i128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }

    /// Renders the amount without trailing fractional zeros
    ///
    /// `146500.000000000000` becomes `146500`, `0.500000000000` becomes `0.5`.
    pub fn to_plain_string(&self) -> String {
        let full = self.to_string();
        let trimmed = full.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    }

    /// Lossy conversion for display-only ratios
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / UNIT as f64
    }
}

/// Converts a KES amount into AVAX at a fixed KES-per-AVAX rate
///
/// The quotient is rounded half up to 12 fractional digits.
///
/// # Errors
///
/// - [`AmountError::NonPositiveRate`] if `rate` is zero or negative
/// - [`AmountError::Overflow`] if the intermediate product does not fit
pub fn kes_to_avax(amount_kes: i64, rate: Amount) -> Result<Amount, AmountError> {
    if !rate.is_positive() {
        return Err(AmountError::NonPositiveRate);
    }

    // kes * 10^12 (result scale) * 10^12 (cancels the rate's scale) / rate_units
    let numerator = i128::from(amount_kes)
        .checked_mul(UNIT)
        .and_then(|n| n.checked_mul(UNIT))
        .ok_or(AmountError::Overflow)?;

    Ok(Amount(div_round_half_up(numerator, rate.0)))
}

fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = UNIT as u128;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / unit,
            abs % unit,
            width = SCALE as usize
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole_part, fraction_part) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole_part.is_empty() || !all_digits(whole_part) || !all_digits(fraction_part) {
            return Err(AmountError::Invalid(s.to_string()));
        }

        if fraction_part.len() > SCALE as usize {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let whole = whole_part
            .parse::<i128>()
            .map_err(|_| AmountError::Overflow)?;
        let fraction = if fraction_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fraction_part, width = SCALE as usize);
            padded
                .parse::<i128>()
                .map_err(|_| AmountError::Invalid(s.to_string()))?
        };

        let units = whole
            .checked_mul(UNIT)
            .and_then(|w| w.checked_add(fraction))
            .ok_or(AmountError::Overflow)?;

        Ok(Amount(if negative { -units } else { units }))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_conversion_example() {
        let rate = Amount::from_whole(146_500);
        let avax = kes_to_avax(1000, rate).unwrap();
        assert_eq!(avax.to_string(), "0.006825938567");
    }

    #[test]
    fn test_conversion_rounds_half_up() {
        let rate = Amount::from_whole(3);
        assert_eq!(kes_to_avax(2, rate).unwrap().to_string(), "0.666666666667");
        assert_eq!(kes_to_avax(1, rate).unwrap().to_string(), "0.333333333333");
    }

    #[test]
    fn test_conversion_rejects_zero_rate() {
        let result = kes_to_avax(100, Amount::ZERO);
        assert_eq!(result.unwrap_err(), AmountError::NonPositiveRate);
    }

    #[test]
    fn test_parse_and_display() {
        let amount: Amount = "12.5".parse().unwrap();
        assert_eq!(amount.to_string(), "12.500000000000");
        assert_eq!(amount.to_plain_string(), "12.5");

        let whole: Amount = "146500".parse().unwrap();
        assert_eq!(whole, Amount::from_whole(146_500));
        assert_eq!(whole.to_plain_string(), "146500");

        let negative: Amount = "-0.000000000001".parse().unwrap();
        assert_eq!(negative.units(), -1);
        assert_eq!(negative.to_string(), "-0.000000000001");
    }

    #[test]
    fn test_parse_postgres_numeric_text() {
        let amount: Amount = "146500.000000000000".parse().unwrap();
        assert_eq!(amount, Amount::from_whole(146_500));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("".parse::<Amount>(), Err(AmountError::Invalid(_))));
        assert!(matches!("abc".parse::<Amount>(), Err(AmountError::Invalid(_))));
        assert!(matches!(".5".parse::<Amount>(), Err(AmountError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid(_))));
        assert!(matches!(
            "0.0000000000001".parse::<Amount>(),
            Err(AmountError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_checked_add() {
        let a: Amount = "0.006825938567".parse().unwrap();
        let b: Amount = "0.003412969283".parse().unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "0.010238907850");

        let max = Amount::from_units(i128::MAX);
        assert_eq!(max.checked_add(Amount::from_units(1)), Err(AmountError::Overflow));
    }

    #[test]
    fn test_serde_as_string() {
        let amount = Amount::from_whole(2);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"2.000000000000\"");

        let back: Amount = serde_json::from_str("\"0.25\"").unwrap();
        assert_eq!(back.to_string(), "0.250000000000");
    }
}
