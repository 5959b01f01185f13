//! Employee persistence: validation, a storage trait and its two backends.

mod error;
mod form;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::{DbError, DbErrorKind};
pub use form::{EmployeeDraft, EmployeeForm, FieldError, ValidationError};
pub use memory::InMemoryEmployeeStore;
pub use models::{Employee, EmployeeChanges, NewEmployee};
pub use repository::{EmployeeRepository, MIGRATIONS};
pub use store::{EmployeeStore, sample_employees};
