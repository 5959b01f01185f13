//! Database models and domain types.

use chrono::{NaiveDate, NaiveDateTime};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::{EmployeeDraft, schema};

/// Employee database model.
#[derive(
    Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize,
)]
#[diesel(table_name = schema::employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    id: i32,
    name: String,
    email: String,
    department: String,
    position: Option<String>,
    salary: Option<f64>,
    hire_date: NaiveDate,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
}

impl Employee {
    /// Builds a freshly created, active employee.
    pub(crate) fn from_draft(id: i32, draft: EmployeeDraft, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            department: draft.department,
            position: draft.position,
            salary: draft.salary,
            hire_date: draft.hire_date,
            is_active: true,
            created_at,
            updated_at: None,
        }
    }

    /// Overwrites every editable field.
    pub(crate) fn apply(&mut self, draft: EmployeeDraft, now: NaiveDateTime) {
        self.name = draft.name;
        self.email = draft.email;
        self.department = draft.department;
        self.position = draft.position;
        self.salary = draft.salary;
        self.hire_date = draft.hire_date;
        self.is_active = draft.is_active;
        self.updated_at = Some(now);
    }

    /// Soft delete.
    pub(crate) fn deactivate(&mut self, now: NaiveDateTime) {
        self.is_active = false;
        self.updated_at = Some(now);
    }

    /// Substring match on name, email, department or position.
    ///
    /// Only ASCII letters are case folded, as SQLite `LIKE` does.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_ascii_lowercase();
        [
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            Some(self.department.as_str()),
            self.position.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_ascii_lowercase().contains(&needle))
    }
}

/// Insertable employee model for creating new rows.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::employees)]
pub struct NewEmployee {
    name: String,
    email: String,
    department: String,
    position: Option<String>,
    salary: Option<f64>,
    hire_date: NaiveDate,
    is_active: bool,
    created_at: NaiveDateTime,
}

impl NewEmployee {
    /// New rows are always active.
    pub fn from_draft(draft: EmployeeDraft, created_at: NaiveDateTime) -> Self {
        Self::new(
            draft.name,
            draft.email,
            draft.department,
            draft.position,
            draft.salary,
            draft.hire_date,
            true,
            created_at,
        )
    }
}

/// Full-row update applied by `PUT`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::employees, treat_none_as_null = true)]
pub struct EmployeeChanges {
    name: String,
    email: String,
    department: String,
    position: Option<String>,
    salary: Option<f64>,
    hire_date: NaiveDate,
    is_active: bool,
    updated_at: Option<NaiveDateTime>,
}

impl EmployeeChanges {
    /// Builds a changeset stamped with `now`.
    pub fn from_draft(draft: EmployeeDraft, now: NaiveDateTime) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
            department: draft.department,
            position: draft.position,
            salary: draft.salary,
            hire_date: draft.hire_date,
            is_active: draft.is_active,
            updated_at: Some(now),
        }
    }
}
