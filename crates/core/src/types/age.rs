//! Age type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing an [`Age`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AgeError {
    /// The value is below zero.
    #[error("age must be a non-negative integer (got {0})")]
    Negative(i64),
    /// The value does not fit the storage column.
    #[error("age must be at most {max} (got {value})")]
    TooLarge {
        /// Largest accepted age.
        max: i64,
        /// The rejected value.
        value: i64,
    },
}

/// A person's age in whole years.
///
/// Always non-negative. Stored as a Postgres `INTEGER` with a matching
/// `CHECK (age >= 0)` constraint.
///
/// ## Examples
///
/// ```
/// use roster_core::Age;
///
/// assert_eq!(Age::new(20).unwrap().get(), 20);
/// assert!(Age::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Age(i32);

impl Age {
    /// Largest accepted age (the `INTEGER` column limit).
    pub const MAX: i64 = i32::MAX as i64;

    /// Create an age from any integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or exceeds [`Age::MAX`].
    pub fn new(value: i64) -> Result<Self, AgeError> {
        if value < 0 {
            return Err(AgeError::Negative(value));
        }
        i32::try_from(value).map(Self).map_err(|_| AgeError::TooLarge {
            max: Self::MAX,
            value,
        })
    }

    /// Get the age in years.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Age {
    type Error = AgeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for i64 {
    fn from(age: Age) -> Self {
        Self::from(age.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Age {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Age {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(i64::from(raw))?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Age {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
