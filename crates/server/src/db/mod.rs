//! Database operations for the roster `PostgreSQL` store.
//!
//! # Schema: `roster`
//!
//! ## Tables
//!
//! - `student` - Students (enrolment number)
//! - `staff` - Staff members (staff ID)
//! - `employee` - Employees (employee ID, salary)
//!
//! The tables are independent; nothing cascades between them.
//!
//! # Access
//!
//! Handlers never touch the pool directly. They go through the [`Store`]
//! handed to them in [`crate::state::AppState`], which exposes one
//! [`Repository`] per record type plus the cross-table aggregates.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p roster-cli -- migrate
//! ```

#[cfg(test)]
pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::{Employee, Entity, Staff, Student};

pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Number of records sharing a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DepartmentCount {
    /// Department name; empty for records without one.
    pub department: String,
    /// Records in the department.
    pub count: i64,
}

/// CRUD and per-table aggregates for one record type.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<T>, RepositoryError>;

    /// A single record, or `None` if the key is unknown.
    async fn get(&self, id: T::Id) -> Result<Option<T>, RepositoryError>;

    /// Insert a record and return it with its assigned key.
    async fn create(&self, draft: &T::Draft) -> Result<T, RepositoryError>;

    /// Overwrite every writable field. Returns `None` if the key is unknown.
    async fn update(&self, id: T::Id, draft: &T::Draft) -> Result<Option<T>, RepositoryError>;

    /// Delete a record. Returns `false` if the key is unknown.
    async fn delete(&self, id: T::Id) -> Result<bool, RepositoryError>;

    /// Total number of records.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Record counts per department, largest first, ties by department name.
    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, RepositoryError>;
}

/// The persistent store behind every handler.
#[async_trait]
pub trait Store: Send + Sync {
    /// Student records.
    fn students(&self) -> &dyn Repository<Student>;

    /// Staff records.
    fn staff(&self) -> &dyn Repository<Staff>;

    /// Employee records.
    fn employees(&self) -> &dyn Repository<Employee>;

    /// Mean salary over employees that have one; `None` when none do.
    async fn average_salary(&self) -> Result<Option<Decimal>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Select the repository for a record type.
///
/// Lets handlers be written once, generic over the record type.
pub trait Stored: Entity {
    /// This type's repository within `store`.
    fn repository(store: &dyn Store) -> &dyn Repository<Self>;
}

impl Stored for Student {
    fn repository(store: &dyn Store) -> &dyn Repository<Self> {
        store.students()
    }
}

impl Stored for Staff {
    fn repository(store: &dyn Store) -> &dyn Repository<Self> {
        store.staff()
    }
}

impl Stored for Employee {
    fn repository(store: &dyn Store) -> &dyn Repository<Self> {
        store.employees()
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
