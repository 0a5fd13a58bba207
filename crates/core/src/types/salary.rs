//! Salary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Salary`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SalaryError {
    /// More fractional digits than the column stores.
    #[error("salary must have at most {max} decimal places")]
    TooManyDecimalPlaces {
        /// Maximum fractional digits.
        max: u32,
    },
    /// More digits overall than the column stores.
    #[error("salary must have at most {max} digits in total")]
    TooManyDigits {
        /// Maximum total digits.
        max: u32,
    },
}

/// An employee salary.
///
/// Mirrors a `NUMERIC(10, 2)` column: at most ten digits, two of them after
/// the decimal point. Values are rescaled to exactly two places, so `1200`
/// and `1200.0` both serialize as `"1200.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Salary(Decimal);

impl Salary {
    /// Fractional digits kept.
    pub const SCALE: u32 = 2;
    /// Total digits kept.
    pub const PRECISION: u32 = 10;

    /// Create a salary from a decimal amount.
    ///
    /// Trailing zeros beyond two places are ignored (`12.500` is accepted).
    ///
    /// # Errors
    ///
    /// Returns an error if the amount needs more than two decimal places or
    /// more than ten digits overall.
    pub fn new(amount: Decimal) -> Result<Self, SalaryError> {
        let normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(SalaryError::TooManyDecimalPlaces { max: Self::SCALE });
        }

        let mut rescaled = normalized;
        rescaled.rescale(Self::SCALE);

        let digits = rescaled.mantissa().unsigned_abs().to_string().len();
        if digits > Self::PRECISION as usize {
            return Err(SalaryError::TooManyDigits {
                max: Self::PRECISION,
            });
        }

        Ok(Self(rescaled))
    }

    /// Get the amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Salary {
    type Error = SalaryError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Salary> for Decimal {
    fn from(salary: Salary) -> Self {
        salary.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Salary {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Salary {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Salary {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
