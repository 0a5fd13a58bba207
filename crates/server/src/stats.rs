//! Dashboard aggregates over all three record tables.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{DepartmentCount, RepositoryError, Store};

/// Totals and the mean employee salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overall {
    pub total_students: i64,
    pub total_staff: i64,
    pub total_employees: i64,
    /// Mean over employees with a salary; 0 when there are none.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_employee_salary: Decimal,
}

/// Response body for `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub students_by_dept: Vec<DepartmentCount>,
    pub staff_by_dept: Vec<DepartmentCount>,
    pub employees_by_dept: Vec<DepartmentCount>,
    pub overall: Overall,
}

/// Collect every aggregate from `store`.
///
/// # Errors
///
/// Returns the first repository error.
pub async fn collect(store: &dyn Store) -> Result<StatsResponse, RepositoryError> {
    let students_by_dept = store.students().count_by_department().await?;
    let staff_by_dept = store.staff().count_by_department().await?;
    let employees_by_dept = store.employees().count_by_department().await?;

    let overall = Overall {
        total_students: store.students().count().await?,
        total_staff: store.staff().count().await?,
        total_employees: store.employees().count().await?,
        avg_employee_salary: store.average_salary().await?.unwrap_or(Decimal::ZERO),
    };

    Ok(StatsResponse {
        students_by_dept,
        staff_by_dept,
        employees_by_dept,
        overall,
    })
}
