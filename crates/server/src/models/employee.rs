//! Employee records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roster_core::{
    Age, CODE_MAX_CHARS, DEPARTMENT_MAX_CHARS, EmployeeId, NAME_MAX_CHARS, Salary, TextError,
    check_text,
};

use super::{Draft, Entity, Patch, nullable, set_if_present};

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    /// Auto-assigned key.
    pub id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Age in years, if known.
    pub age: Option<Age>,
    /// Department (empty when unknown).
    pub department: String,
    /// Employee identifier (empty when unknown).
    pub emp_id: String,
    /// Salary with two decimal places, serialized as a string.
    pub salary: Option<Salary>,
    /// Date the employee joined.
    pub joined: Option<NaiveDate>,
}

/// Writable employee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    #[serde(default)]
    pub age: Option<Age>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub joined: Option<NaiveDate>,
}

/// Partial employee update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<Age>>,
    pub department: Option<String>,
    pub emp_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary: Option<Option<Salary>>,
    #[serde(default, deserialize_with = "nullable")]
    pub joined: Option<Option<NaiveDate>>,
}

impl Draft for EmployeeDraft {
    fn validate(&self) -> Result<(), TextError> {
        check_text("name", &self.name, NAME_MAX_CHARS, true)?;
        check_text("department", &self.department, DEPARTMENT_MAX_CHARS, false)?;
        check_text("emp_id", &self.emp_id, CODE_MAX_CHARS, false)
    }
}

impl Patch<EmployeeDraft> for EmployeePatch {
    fn apply_to(self, draft: &mut EmployeeDraft) {
        set_if_present(&mut draft.name, self.name);
        set_if_present(&mut draft.age, self.age);
        set_if_present(&mut draft.department, self.department);
        set_if_present(&mut draft.emp_id, self.emp_id);
        set_if_present(&mut draft.salary, self.salary);
        set_if_present(&mut draft.joined, self.joined);
    }
}

impl Entity for Employee {
    type Id = EmployeeId;
    type Draft = EmployeeDraft;
    type Patch = EmployeePatch;

    const KIND: &'static str = "employee";
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn department(&self) -> &str {
        &self.department
    }

    fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            age: self.age,
            department: self.department.clone(),
            emp_id: self.emp_id.clone(),
            salary: self.salary,
            joined: self.joined,
        }
    }

    fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            department: draft.department,
            emp_id: draft.emp_id,
            salary: draft.salary,
            joined: draft.joined,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_salary_accepts_string_or_number() {
        let from_str: EmployeeDraft =
            serde_json::from_value(json!({"name": "Kavi", "salary": "52000.5"})).unwrap();
        let from_num: EmployeeDraft =
            serde_json::from_value(json!({"name": "Kavi", "salary": 52000.5})).unwrap();
        assert_eq!(from_str.salary, from_num.salary);
        assert_eq!(from_str.salary.unwrap().to_string(), "52000.50");
    }

    #[test]
    fn test_salary_rejects_three_decimals() {
        let result =
            serde_json::from_value::<EmployeeDraft>(json!({"name": "Kavi", "salary": "1.005"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serializes_salary_as_string() {
        let employee = Employee::from_draft(
            EmployeeId::new(3),
            serde_json::from_value(json!({"name": "Kavi", "salary": "1200"})).unwrap(),
        );
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["salary"], json!("1200.00"));
        assert_eq!(value["emp_id"], json!(""));
    }

    #[test]
    fn test_patch_clears_salary() {
        let mut draft: EmployeeDraft =
            serde_json::from_value(json!({"name": "Kavi", "salary": "10"})).unwrap();
        let patch: EmployeePatch = serde_json::from_value(json!({"salary": null})).unwrap();
        patch.apply_to(&mut draft);
        assert_eq!(draft.salary, None);
        assert_eq!(draft.name, "Kavi");
    }
}
