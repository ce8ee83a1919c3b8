//! Fixed-point money amounts with two decimal places.
//!
//! Prices are held as whole cents. Parsing never goes through floating point:
//! callers hand in the decimal text (JSON numbers are rendered back to text by
//! the HTTP adapter) and the digits are accumulated with checked arithmetic.

use std::fmt;
use std::str::FromStr;

/// Largest accepted amount, in cents (`99,999,999.99`).
pub const PRICE_MAX_CENTS: i64 = 9_999_999_999;

/// Reasons a price cannot be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price must be a decimal number")]
    Malformed,
    #[error("price must have at most two decimal places")]
    TooPrecise,
    #[error("price must be greater than zero")]
    NotPositive,
    #[error("price must not exceed 99999999.99")]
    TooLarge,
}

/// Strictly positive amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// Construct from a cent count.
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::{Price, PriceError};
    ///
    /// assert_eq!(Price::from_cents(1000).map(|p| p.to_string()), Ok("10.00".to_owned()));
    /// assert_eq!(Price::from_cents(0), Err(PriceError::NotPositive));
    /// ```
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents <= 0 {
            return Err(PriceError::NotPositive);
        }
        if cents > PRICE_MAX_CENTS {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(cents))
    }

    /// Amount in cents.
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

fn accumulate(digits: &str, start: i64) -> Result<i64, PriceError> {
    digits.chars().try_fold(start, |acc, ch| {
        let digit = ch.to_digit(10).ok_or(PriceError::Malformed)?;
        acc.checked_mul(10)
            .and_then(|value| value.checked_add(i64::from(digit)))
            .ok_or(PriceError::TooLarge)
    })
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if !unsigned.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
            return Err(PriceError::Malformed);
        }
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(PriceError::Malformed);
        }
        if fraction.len() > 2 {
            let (kept, rest) = fraction.split_at(2);
            accumulate(kept, 0)?;
            // Trailing zeros such as "10.500" carry no extra precision.
            if accumulate(rest, 0)? != 0 {
                return Err(PriceError::TooPrecise);
            }
            return Self::from_str(&format!(
                "{}{whole}.{kept}",
                if negative { "-" } else { "" }
            ));
        }
        let whole_cents = accumulate(whole, 0)?
            .checked_mul(100)
            .ok_or(PriceError::TooLarge)?;
        let padded = format!("{fraction:0<2}");
        let cents = whole_cents
            .checked_add(accumulate(&padded, 0)?)
            .ok_or(PriceError::TooLarge)?;
        if negative && cents != 0 {
            return Err(PriceError::NotPositive);
        }
        Self::from_cents(cents)
    }
}
