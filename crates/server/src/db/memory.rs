//! In-memory store for handler tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Error as SqlxError;

use super::{DepartmentCount, Repository, RepositoryError, Store};
use crate::models::{Employee, Entity, Staff, Student};

/// Shared insert budget, so tests can make the Nth create fail.
#[derive(Default)]
struct InsertBudget {
    remaining: Option<AtomicUsize>,
}

impl InsertBudget {
    fn take(&self) -> Result<(), RepositoryError> {
        let Some(remaining) = &self.remaining else {
            return Ok(());
        };
        remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| {
                RepositoryError::Database(SqlxError::Protocol("insert budget exhausted".into()))
            })
    }
}

struct Table<T: Entity> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// One in-memory table.
pub struct MemoryRepository<T: Entity> {
    table: Mutex<Table<T>>,
    budget: Arc<InsertBudget>,
}

impl<T: Entity> MemoryRepository<T> {
    fn new(budget: Arc<InsertBudget>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            budget,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table<T>> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.lock().rows.values().cloned().collect())
    }

    async fn get(&self, id: T::Id) -> Result<Option<T>, RepositoryError> {
        let key: i32 = id.into();
        Ok(self.lock().rows.get(&key).cloned())
    }

    async fn create(&self, draft: &T::Draft) -> Result<T, RepositoryError> {
        self.budget.take()?;
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        let record = T::from_draft(T::Id::from(id), draft.clone());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: T::Id, draft: &T::Draft) -> Result<Option<T>, RepositoryError> {
        let mut table = self.lock();
        let key: i32 = id.into();
        let Some(slot) = table.rows.get_mut(&key) else {
            return Ok(None);
        };
        *slot = T::from_draft(id, draft.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: T::Id) -> Result<bool, RepositoryError> {
        let key: i32 = id.into();
        Ok(self.lock().rows.remove(&key).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(i64::try_from(self.lock().rows.len()).unwrap_or(i64::MAX))
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, RepositoryError> {
        let mut groups: BTreeMap<String, i64> = BTreeMap::new();
        for record in self.lock().rows.values() {
            *groups.entry(record.department().to_owned()).or_insert(0) += 1;
        }
        let mut counts: Vec<DepartmentCount> = groups
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect();
        // BTreeMap iteration is already department-ascending; stable sort keeps it for ties.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }
}

/// In-memory [`Store`].
pub struct MemoryStore {
    students: MemoryRepository<Student>,
    staff: MemoryRepository<Staff>,
    employees: MemoryRepository<Employee>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_budget(InsertBudget::default())
    }
}

impl MemoryStore {
    /// An empty store with no insert limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store whose creates fail after `limit` successful inserts.
    pub fn failing_after(limit: usize) -> Self {
        Self::with_budget(InsertBudget {
            remaining: Some(AtomicUsize::new(limit)),
        })
    }

    fn with_budget(budget: InsertBudget) -> Self {
        let budget = Arc::new(budget);
        Self {
            students: MemoryRepository::new(budget.clone()),
            staff: MemoryRepository::new(budget.clone()),
            employees: MemoryRepository::new(budget),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
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
        let salaries: Vec<Decimal> = self
            .employees
            .lock()
            .rows
            .values()
            .filter_map(|employee| employee.salary.map(roster_core::Salary::amount))
            .collect();
        if salaries.is_empty() {
            return Ok(None);
        }
        let total: Decimal = salaries.iter().sum();
        Ok(Some(total / Decimal::from(salaries.len())))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
