//! Map an extracted table row onto one of the record types.
//!
//! Classification, in order:
//!
//! 1. `role` contains "student", or any table in the document has a `roll`
//!    column → student
//! 2. `role` contains "staff" → staff
//! 3. anything else → employee
//!
//! Only name, age and department are carried over; every other column is
//! dropped. A bad cell never fails the row: it just leaves the field unset.

use serde::Serialize;

use roster_core::Age;

use super::table::Row;
use crate::models::{EmployeeDraft, StaffDraft, StudentDraft};

const NAME_COLUMNS: &[&str] = &["name", "full name", "student name"];
const DEPARTMENT_COLUMNS: &[&str] = &["department", "dept"];

/// Name used when no name column has a value.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Which table a row belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Student,
    Staff,
    Employee,
}

/// The fields recovered from one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRow {
    pub kind: Kind,
    pub name: String,
    pub age: Option<Age>,
    pub department: String,
}

impl ClassifiedRow {
    /// Classify and extract a row.
    ///
    /// `roll_in_document` is whether any table in the same document has a
    /// `roll` column.
    #[must_use]
    pub fn from_row(row: &Row<'_>, roll_in_document: bool) -> Self {
        Self {
            kind: classify(row, roll_in_document),
            name: row.first_of(NAME_COLUMNS).unwrap_or(UNKNOWN_NAME).to_owned(),
            age: row.get("age").and_then(coerce_age),
            department: row.first_of(DEPARTMENT_COLUMNS).unwrap_or_default().to_owned(),
        }
    }

    #[must_use]
    pub fn into_student(self) -> StudentDraft {
        StudentDraft {
            name: self.name,
            age: self.age,
            department: self.department,
            ..StudentDraft::default()
        }
    }

    #[must_use]
    pub fn into_staff(self) -> StaffDraft {
        StaffDraft {
            name: self.name,
            age: self.age,
            department: self.department,
            ..StaffDraft::default()
        }
    }

    #[must_use]
    pub fn into_employee(self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name,
            age: self.age,
            department: self.department,
            ..EmployeeDraft::default()
        }
    }
}

/// Decide a row's record type.
#[must_use]
pub fn classify(row: &Row<'_>, roll_in_document: bool) -> Kind {
    let role = row.get("role").map(str::to_lowercase).unwrap_or_default();

    if role.contains("student") || roll_in_document {
        Kind::Student
    } else if role.contains("staff") {
        Kind::Staff
    } else {
        Kind::Employee
    }
}

/// Read an age cell: parse as a float, truncate toward zero.
///
/// Returns `None` for anything unparseable, non-finite, negative, or too
/// large to store.
#[must_use]
pub fn coerce_age(cell: &str) -> Option<Age> {
    let cell = cell.trim();
    let Ok(value) = cell.parse::<f64>() else {
        tracing::debug!(cell, "Ignoring unparseable age");
        return None;
    };
    if !value.is_finite() {
        tracing::debug!(cell, "Ignoring non-finite age");
        return None;
    }

    let whole = value.trunc();
    // Age::MAX is i32::MAX, which f64 represents exactly.
    #[allow(clippy::cast_precision_loss)]
    let in_range = (0.0..=Age::MAX as f64).contains(&whole);
    if !in_range {
        tracing::debug!(cell, "Ignoring out-of-range age");
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let years = whole as i64;
    Age::new(years).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::ingest::table::{RawTable, Table};

    fn table(rows: &[&[&str]]) -> Table {
        let raw: RawTable = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| (*cell).to_owned()))
                    .collect()
            })
            .collect();
        Table::from_raw(raw).unwrap()
    }

    fn classified(table: &Table) -> Vec<ClassifiedRow> {
        let roll = table.has_column("roll");
        table.rows().map(|row| ClassifiedRow::from_row(&row, roll)).collect()
    }

    #[test]
    fn test_student_role_row() {
        let t = table(&[
            &["name", "age", "department", "role"],
            &["Ann", "20", "CS", "student"],
        ]);
        let rows = classified(&t);
        assert_eq!(
            rows,
            vec![ClassifiedRow {
                kind: Kind::Student,
                name: "Ann".to_owned(),
                age: Some(Age::new(20).unwrap()),
                department: "CS".to_owned(),
            }]
        );
    }

    #[test]
    fn test_no_role_or_roll_defaults_to_employee() {
        let t = table(&[&["name", "department"], &["Ann", "CS"], &["Bo", "Maths"]]);
        assert!(classified(&t).iter().all(|row| row.kind == Kind::Employee));
    }

    #[test]
    fn test_role_match_is_case_insensitive_substring() {
        let t = table(&[
            &["Name", "Role"],
            &["Ann", "PhD Student"],
            &["Bo", "Teaching STAFF"],
            &["Cy", "contractor"],
        ]);
        let kinds: Vec<Kind> = classified(&t).iter().map(|row| row.kind).collect();
        assert_eq!(kinds, vec![Kind::Student, Kind::Staff, Kind::Employee]);
    }

    #[test]
    fn test_roll_column_makes_every_row_a_student() {
        let t = table(&[
            &["roll", "name", "role"],
            &["1", "Ann", "staff"],
            &["2", "Bo", ""],
        ]);
        assert!(classified(&t).iter().all(|row| row.kind == Kind::Student));
    }

    #[test]
    fn test_name_fallbacks() {
        let t = table(&[
            &["name", "full name", "student name"],
            &["", "Ann Lee", "A. Lee"],
            &["", "", "Bo"],
            &["", "", ""],
        ]);
        let names: Vec<String> = classified(&t).into_iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["Ann Lee", "Bo", UNKNOWN_NAME]);
    }

    #[test]
    fn test_department_falls_back_to_dept() {
        let t = table(&[&["name", "dept"], &["Ann", "Physics"], &["Bo", ""]]);
        let rows = classified(&t);
        assert_eq!(rows[0].department, "Physics");
        assert_eq!(rows[1].department, "");
    }

    #[test]
    fn test_bad_age_left_unset() {
        let t = table(&[&["name", "age"], &["Ann", "N/A"], &["Bo", "31"]]);
        let rows = classified(&t);
        assert_eq!(rows[0].age, None);
        assert_eq!(rows[1].age, Some(Age::new(31).unwrap()));
    }

    #[test]
    fn test_coerce_age() {
        assert_eq!(coerce_age("20.9"), Some(Age::new(20).unwrap()));
        assert_eq!(coerce_age(" 42 "), Some(Age::new(42).unwrap()));
        assert_eq!(coerce_age("-0.5"), Some(Age::new(0).unwrap()));
        assert_eq!(coerce_age("-3"), None);
        assert_eq!(coerce_age("NaN"), None);
        assert_eq!(coerce_age("inf"), None);
        assert_eq!(coerce_age("1e12"), None);
        assert_eq!(coerce_age("twenty"), None);
    }

    #[test]
    fn test_into_draft_keeps_other_fields_default() {
        let t = table(&[&["name", "salary", "emp_id"], &["Kavi", "900", "E-1"]]);
        let row = classified(&t).remove(0);
        let draft = row.into_employee();
        assert_eq!(draft.name, "Kavi");
        assert_eq!(draft.salary, None);
        assert_eq!(draft.emp_id, "");
    }
}
