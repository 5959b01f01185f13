//! In-memory employee store.

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, Employee, EmployeeDraft, EmployeeStore};

#[derive(Debug, Default)]
struct Rows {
    last_id: i32,
    by_id: BTreeMap<i32, Employee>,
}

impl Rows {
    fn email_holder(&self, email: &str, except: Option<i32>) -> Option<i32> {
        self.by_id
            .values()
            .find(|e| e.email() == email && Some(*e.id()) != except)
            .map(|e| *e.id())
    }
}

/// Employee store kept in process memory. Contents vanish on exit.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    rows: RwLock<Rows>,
}

impl InMemoryEmployeeStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory employee store");
        Self::default()
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn list_active(&self) -> Result<Vec<Employee>, DbError> {
        let rows = self.rows.read().map_err(|_| DbError::poisoned())?;
        Ok(rows
            .by_id
            .values()
            .filter(|e| *e.is_active())
            .cloned()
            .collect())
    }

    fn get(&self, id: i32) -> Result<Option<Employee>, DbError> {
        let rows = self.rows.read().map_err(|_| DbError::poisoned())?;
        Ok(rows.by_id.get(&id).cloned())
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DbError> {
        let mut rows = self.rows.write().map_err(|_| DbError::poisoned())?;
        if let Some(holder) = rows.email_holder(&draft.email, None) {
            warn!(holder, "Email already in use");
            return Err(DbError::duplicate_email(&draft.email));
        }

        rows.last_id += 1;
        let id = rows.last_id;
        let employee = Employee::from_draft(id, draft, Utc::now().naive_utc());
        rows.by_id.insert(id, employee.clone());

        info!(employee_id = id, "Employee created");
        Ok(employee)
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    fn update(&self, id: i32, draft: EmployeeDraft) -> Result<Employee, DbError> {
        let mut rows = self.rows.write().map_err(|_| DbError::poisoned())?;
        if !rows.by_id.contains_key(&id) {
            return Err(DbError::not_found(id));
        }
        if let Some(holder) = rows.email_holder(&draft.email, Some(id)) {
            warn!(holder, "Email already used by another employee");
            return Err(DbError::duplicate_email(&draft.email));
        }

        let employee = rows
            .by_id
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found(id))?;
        employee.apply(draft, Utc::now().naive_utc());

        info!("Employee updated");
        Ok(employee.clone())
    }

    #[instrument(skip(self))]
    fn deactivate(&self, id: i32) -> Result<Employee, DbError> {
        let mut rows = self.rows.write().map_err(|_| DbError::poisoned())?;
        let employee = rows
            .by_id
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found(id))?;
        employee.deactivate(Utc::now().naive_utc());

        info!(name = %employee.name(), "Employee deactivated");
        Ok(employee.clone())
    }

    #[instrument(skip(self))]
    fn search(&self, keyword: &str) -> Result<Vec<Employee>, DbError> {
        let rows = self.rows.read().map_err(|_| DbError::poisoned())?;
        let mut found: Vec<Employee> = rows
            .by_id
            .values()
            .filter(|e| *e.is_active() && e.matches_keyword(keyword))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(count = found.len(), "Search completed");
        Ok(found)
    }

    fn departments(&self) -> Result<Vec<String>, DbError> {
        let rows = self.rows.read().map_err(|_| DbError::poisoned())?;
        let names: BTreeSet<&String> = rows
            .by_id
            .values()
            .filter(|e| *e.is_active())
            .map(|e| e.department())
            .collect();
        Ok(names.into_iter().cloned().collect())
    }

    fn count(&self) -> Result<i64, DbError> {
        let rows = self.rows.read().map_err(|_| DbError::poisoned())?;
        Ok(rows.by_id.len() as i64)
    }
}
