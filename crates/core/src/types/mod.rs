//! Core types for Roster.
//!
//! This module provides type-safe wrappers for the record fields that carry
//! invariants (non-negative ages, two-decimal salaries, bounded text).

pub mod age;
pub mod id;
pub mod salary;
pub mod text;

pub use age::{Age, AgeError};
pub use id::*;
pub use salary::{Salary, SalaryError};
pub use text::{CODE_MAX_CHARS, DEPARTMENT_MAX_CHARS, NAME_MAX_CHARS, TextError, check_text};
