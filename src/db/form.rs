//! Employee request bodies and field validation.

use chrono::NaiveDate;
use derive_getters::Getters;
use derive_more::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, instrument};

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const DEPARTMENT_MAX: usize = 50;
const POSITION_MAX: usize = 50;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9-]+(?:\.[A-Z0-9-]+)*\.[A-Z]{2,}$")
        .expect("email pattern compiles")
});

/// Employee body accepted by create and update.
///
/// Every field is optional on the wire so that missing values surface as
/// field-level validation errors instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeForm {
    /// Must match the path id on update when present.
    pub id: Option<i32>,
    /// Full name.
    pub name: String,
    /// Contact email, unique across employees.
    pub email: String,
    /// Department name.
    pub department: String,
    /// Job title.
    pub position: Option<String>,
    /// Salary, never negative.
    pub salary: Option<f64>,
    /// Date the employee started.
    pub hire_date: Option<NaiveDate>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

/// A form that passed validation; the only input the stores accept.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct EmployeeDraft {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) department: String,
    pub(crate) position: Option<String>,
    pub(crate) salary: Option<f64>,
    pub(crate) hire_date: NaiveDate,
    pub(crate) is_active: bool,
}

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field errors found in a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Failing fields in declaration order.
    pub fields: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed for {} field(s)", self.fields.len())
    }
}

fn check_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    max: usize,
    required: bool,
) {
    if required && value.is_empty() {
        errors.push(FieldError::new(field, format!("{field} is required")));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
}

impl EmployeeForm {
    /// Checks every field and returns a trimmed draft.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every failing field.
    #[instrument(skip(self), fields(email = %self.email))]
    pub fn validate(self) -> Result<EmployeeDraft, ValidationError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let department = self.department.trim().to_string();
        let position = self
            .position
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        check_text(&mut errors, "name", &name, NAME_MAX, true);
        check_text(&mut errors, "email", &email, EMAIL_MAX, true);
        if !email.is_empty() && !EMAIL_RE.is_match(&email) {
            errors.push(FieldError::new("email", "email is not a valid address"));
        }
        check_text(&mut errors, "department", &department, DEPARTMENT_MAX, true);
        if let Some(p) = &position {
            check_text(&mut errors, "position", p, POSITION_MAX, false);
        }
        if self.salary.is_some_and(|s| !(s.is_finite() && s >= 0.0)) {
            errors.push(FieldError::new("salary", "salary must be zero or more"));
        }
        if self.hire_date.is_none() {
            errors.push(FieldError::new("hireDate", "hireDate is required"));
        }

        match self.hire_date {
            Some(hire_date) if errors.is_empty() => Ok(EmployeeDraft {
                name,
                email,
                department,
                position,
                salary: self.salary,
                hire_date,
                is_active: self.is_active.unwrap_or(true),
            }),
            _ => {
                debug!(count = errors.len(), "Employee form rejected");
                Err(ValidationError { fields: errors })
            }
        }
    }
}
