//! Exact decimal amounts of money.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The most digits an amount may have, including the decimal places.
const MAX_DIGITS: u32 = 10;
/// The most digits an amount may have after the decimal point.
const MAX_DECIMAL_PLACES: u32 = 2;

/// A non-negative amount of money with at most two decimal places and at
/// most ten digits in total.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if `value` is negative, has more than
    /// two decimal places or more than ten digits.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount("Amount cannot be negative.".to_owned()));
        }

        let value = value.normalize();

        if value.scale() > MAX_DECIMAL_PLACES {
            return Err(Error::InvalidAmount(format!(
                "Amount can have at most {MAX_DECIMAL_PLACES} decimal places."
            )));
        }

        let integer_digits = count_integer_digits(value);
        if integer_digits + MAX_DECIMAL_PLACES > MAX_DIGITS {
            return Err(Error::InvalidAmount(format!(
                "Amount can have at most {} digits before the decimal point.",
                MAX_DIGITS - MAX_DECIMAL_PLACES
            )));
        }

        // Normalizing can leave "-0", which would display with a sign.
        Ok(Self(value.abs()))
    }

    /// Parse an amount from user input such as "12.30".
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if `raw` is not a number or breaks
    /// the rules of [Amount::new].
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(Error::InvalidAmount("Enter an amount.".to_owned()));
        }

        let value = Decimal::from_str(raw)
            .map_err(|_| Error::InvalidAmount("Enter a number.".to_owned()))?;

        Self::new(value)
    }

    /// The amount as a decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

fn count_integer_digits(value: Decimal) -> u32 {
    let mut integer_part = value.trunc().abs();
    let mut digits = 0;

    while !integer_part.is_zero() {
        integer_part = (integer_part / Decimal::TEN).trunc();
        digits += 1;
    }

    digits
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Decimal::from_str(text)
            .map(Amount)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Convert a decimal to a float for display and charting.
///
/// Values too large for a float become zero.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
