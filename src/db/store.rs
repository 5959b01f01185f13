//! Storage-agnostic employee repository interface.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::db::{DbError, DbErrorKind, Employee, EmployeeDraft, EmployeeForm};

/// Operations the HTTP layer needs from employee storage.
///
/// Implementations are synchronous; async callers run them on the blocking
/// thread pool.
pub trait EmployeeStore: Send + Sync {
    /// Active employees ordered by id.
    fn list_active(&self) -> Result<Vec<Employee>, DbError>;

    /// Any employee, active or not.
    fn get(&self, id: i32) -> Result<Option<Employee>, DbError>;

    /// Inserts an active employee.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::db::DbErrorKind::DuplicateEmail`] if the email is taken.
    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DbError>;

    /// Replaces every editable field of an existing employee.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` for an unknown id and `DuplicateEmail` if another
    /// employee holds the email.
    fn update(&self, id: i32, draft: EmployeeDraft) -> Result<Employee, DbError>;

    /// Marks an employee inactive and returns it.
    fn deactivate(&self, id: i32) -> Result<Employee, DbError>;

    /// Active employees whose name, email, department or position contains
    /// `keyword` (case-insensitive), ordered by name.
    fn search(&self, keyword: &str) -> Result<Vec<Employee>, DbError>;

    /// Distinct departments of active employees, sorted.
    fn departments(&self) -> Result<Vec<String>, DbError>;

    /// Total rows, including inactive employees.
    fn count(&self) -> Result<i64, DbError>;

    /// Inserts the sample employees when the store is empty.
    ///
    /// Returns the number of rows inserted.
    #[instrument(skip(self))]
    fn seed_defaults(&self) -> Result<usize, DbError> {
        self.seed_from(sample_employees())
    }

    /// Inserts `forms` when the store is empty.
    ///
    /// Every form is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Fails with [`DbErrorKind::InvalidRecord`] naming the failing fields of
    /// the first invalid form.
    #[instrument(skip(self, forms), fields(count = forms.len()))]
    fn seed_from(&self, forms: Vec<EmployeeForm>) -> Result<usize, DbError> {
        if self.count()? > 0 {
            info!("Employee store already populated, skipping seed");
            return Ok(0);
        }

        let drafts = forms
            .into_iter()
            .map(|form| {
                let email = form.email.clone();
                form.validate().map_err(|e| {
                    let fields: Vec<&str> = e.fields.iter().map(|f| f.field.as_str()).collect();
                    warn!(%email, ?fields, "Seed record failed validation");
                    DbError::new(
                        DbErrorKind::InvalidRecord,
                        format!("Seed record '{}' is invalid: {}", email, fields.join(", ")),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let inserted = drafts.len();
        for draft in drafts {
            self.create(draft)?;
        }
        info!(inserted, "Seeded employees");
        Ok(inserted)
    }
}

fn sample(
    name: &str,
    email: &str,
    department: &str,
    position: &str,
    salary: f64,
    hire_date: Option<NaiveDate>,
) -> EmployeeForm {
    EmployeeForm {
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        position: Some(position.to_string()),
        salary: Some(salary),
        hire_date,
        ..EmployeeForm::default()
    }
}

/// The three employees the directory ships with.
pub fn sample_employees() -> Vec<EmployeeForm> {
    vec![
        sample(
            "Ming Zhang",
            "ming.zhang@company.com",
            "IT",
            "Software Engineer",
            60000.0,
            NaiveDate::from_ymd_opt(2023, 1, 15),
        ),
        sample(
            "Hua Li",
            "hua.li@company.com",
            "Human Resources",
            "HR Specialist",
            45000.0,
            NaiveDate::from_ymd_opt(2023, 3, 20),
        ),
        sample(
            "Datong Wang",
            "datong.wang@company.com",
            "Sales",
            "Sales Manager",
            80000.0,
            NaiveDate::from_ymd_opt(2022, 8, 10),
        ),
    ]
}
