//! `PostgreSQL` implementation of the store.
//!
//! The three record tables share one shape (`id` plus writable columns), so
//! a single generic repository builds its SQL from each type's column list.
//! Table and column names are compile-time constants; only values are bound.

use std::marker::PhantomData;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use super::{DepartmentCount, Repository, RepositoryError, Store};
use crate::models::{
    Employee, EmployeeDraft, Entity, Staff, StaffDraft, Student, StudentDraft,
};

type PgQueryAs<'q, T> = QueryAs<'q, Postgres, T, PgArguments>;

/// Table layout for a record type.
pub trait PgEntity: Entity + for<'r> sqlx::FromRow<'r, PgRow> {
    /// Schema-qualified table name.
    const TABLE: &'static str;
    /// Writable columns, in the order [`PgEntity::bind_draft`] binds them.
    const COLUMNS: &'static [&'static str];

    /// Bind the draft's values, one per entry in [`PgEntity::COLUMNS`].
    fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q Self::Draft) -> PgQueryAs<'q, Self>;
}

impl PgEntity for Student {
    const TABLE: &'static str = "roster.student";
    const COLUMNS: &'static [&'static str] = &["name", "age", "department", "enrol_no", "joined"];

    fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q StudentDraft) -> PgQueryAs<'q, Self> {
        query
            .bind(&draft.name)
            .bind(draft.age)
            .bind(&draft.department)
            .bind(&draft.enrol_no)
            .bind(draft.joined)
    }
}

impl PgEntity for Staff {
    const TABLE: &'static str = "roster.staff";
    const COLUMNS: &'static [&'static str] = &["name", "age", "department", "staff_id", "joined"];

    fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q StaffDraft) -> PgQueryAs<'q, Self> {
        query
            .bind(&draft.name)
            .bind(draft.age)
            .bind(&draft.department)
            .bind(&draft.staff_id)
            .bind(draft.joined)
    }
}

impl PgEntity for Employee {
    const TABLE: &'static str = "roster.employee";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "age",
        "department",
        "emp_id",
        "salary",
        "joined",
    ];

    fn bind_draft<'q>(
        query: PgQueryAs<'q, Self>,
        draft: &'q EmployeeDraft,
    ) -> PgQueryAs<'q, Self> {
        query
            .bind(&draft.name)
            .bind(draft.age)
            .bind(&draft.department)
            .bind(&draft.emp_id)
            .bind(draft.salary)
            .bind(draft.joined)
    }
}

// =============================================================================
// SQL builders
// =============================================================================

fn returning<T: PgEntity>() -> String {
    format!("id, {}", T::COLUMNS.join(", "))
}

fn select_sql<T: PgEntity>() -> String {
    format!("SELECT {} FROM {}", returning::<T>(), T::TABLE)
}

fn insert_sql<T: PgEntity>() -> String {
    let placeholders = (1..=T::COLUMNS.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders}) RETURNING {}",
        T::TABLE,
        T::COLUMNS.join(", "),
        returning::<T>()
    )
}

fn update_sql<T: PgEntity>() -> String {
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE id = ${} RETURNING {}",
        T::TABLE,
        T::COLUMNS.len() + 1,
        returning::<T>()
    )
}

fn department_counts_sql<T: PgEntity>() -> String {
    format!(
        "SELECT department, COUNT(*) AS count FROM {} \
         GROUP BY department ORDER BY count DESC, department COLLATE \"C\" ASC",
        T::TABLE
    )
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one record table.
pub struct PgRepository<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T> PgRepository<T> {
    /// Create a new repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T: PgEntity> Repository<T> for PgRepository<T> {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let sql = format!("{} ORDER BY id", select_sql::<T>());
        let records = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    async fn get(&self, id: T::Id) -> Result<Option<T>, RepositoryError> {
        let id: i32 = id.into();
        let sql = format!("{} WHERE id = $1", select_sql::<T>());
        let record = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn create(&self, draft: &T::Draft) -> Result<T, RepositoryError> {
        let sql = insert_sql::<T>();
        let record = T::bind_draft(sqlx::query_as::<_, T>(&sql), draft)
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }

    async fn update(&self, id: T::Id, draft: &T::Draft) -> Result<Option<T>, RepositoryError> {
        let id: i32 = id.into();
        let sql = update_sql::<T>();
        let record = T::bind_draft(sqlx::query_as::<_, T>(&sql), draft)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn delete(&self, id: T::Id) -> Result<bool, RepositoryError> {
        let id: i32 = id.into();
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, RepositoryError> {
        let sql = department_counts_sql::<T>();
        let counts = sqlx::query_as::<_, DepartmentCount>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(counts)
    }
}

// =============================================================================
// Store
// =============================================================================

/// The `PostgreSQL`-backed [`Store`].
pub struct PgStore {
    pool: PgPool,
    students: PgRepository<Student>,
    staff: PgRepository<Staff>,
    employees: PgRepository<Employee>,
}

impl PgStore {
    /// Create a store over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            students: PgRepository::new(pool.clone()),
            staff: PgRepository::new(pool.clone()),
            employees: PgRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    fn students(&self) -> &dyn Repository<Student> {
        &self.students
    }

    fn staff(&self) -> &dyn Repository<Staff> {
        &self.staff
    }

    fn employees(&self) -> &dyn Repository<Employee> {
        &self.employees
    }

    async fn average_salary(&self) -> Result<Option<Decimal>, RepositoryError> {
        let average = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT AVG(salary) FROM roster.employee WHERE salary IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(average)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
