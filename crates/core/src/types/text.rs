//! Bounded text fields.
//!
//! Record text columns are `VARCHAR(n)`; these limits are checked before a
//! write reaches the database so callers get a field-level message instead
//! of a constraint error.

/// Maximum length of a person's name.
pub const NAME_MAX_CHARS: usize = 200;
/// Maximum length of a department.
pub const DEPARTMENT_MAX_CHARS: usize = 120;
/// Maximum length of an enrolment number, staff ID or employee ID.
pub const CODE_MAX_CHARS: usize = 80;

/// Errors from [`check_text`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// A required field was empty.
    #[error("{field} may not be blank")]
    Blank {
        /// Field name.
        field: &'static str,
    },
    /// The value is longer than the column.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum characters.
        max: usize,
    },
}

/// Check a text value against its column limit.
///
/// Length is counted in characters, matching `VARCHAR(n)` semantics.
///
/// # Errors
///
/// Returns [`TextError::Blank`] if `required` and the value is empty or
/// whitespace, and [`TextError::TooLong`] if it exceeds `max` characters.
pub fn check_text(
    field: &'static str,
    value: &str,
    max: usize,
    required: bool,
) -> Result<(), TextError> {
    if required && value.trim().is_empty() {
        return Err(TextError::Blank { field });
    }
    if value.chars().count() > max {
        return Err(TextError::TooLong { field, max });
    }
    Ok(())
}
