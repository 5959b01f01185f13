//! Database error types.

use derive_more::{Display, Error};
use diesel::result::DatabaseErrorKind;
use tracing::instrument;

/// Broad category of a database failure, used to pick an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// The requested row does not exist.
    #[display("not found")]
    NotFound,
    /// Another employee already uses the email address.
    #[display("duplicate email")]
    DuplicateEmail,
    /// Could not open the database.
    #[display("connection")]
    Connection,
    /// Schema migration failed.
    #[display("migration")]
    Migration,
    /// Any other query failure.
    #[display("query")]
    Query,
    /// A record failed validation before it could be stored.
    #[display("invalid record")]
    InvalidRecord,
    /// A lock guarding an in-memory store was poisoned.
    #[display("poisoned lock")]
    Poisoned,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// No employee with the given id.
    #[track_caller]
    pub fn not_found(id: i32) -> Self {
        Self::new(DbErrorKind::NotFound, format!("No employee with id {id}"))
    }

    /// Email already belongs to another employee.
    #[track_caller]
    pub fn duplicate_email(email: &str) -> Self {
        Self::new(
            DbErrorKind::DuplicateEmail,
            format!("Email '{email}' is already in use"),
        )
    }

    /// A store lock was poisoned by a panicking writer.
    #[track_caller]
    pub fn poisoned() -> Self {
        Self::new(DbErrorKind::Poisoned, "Employee store lock poisoned")
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::new(DbErrorKind::NotFound, "Row not found"),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::new(DbErrorKind::DuplicateEmail, info.message().to_string())
            }
            other => Self::new(DbErrorKind::Query, format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, format!("Connection error: {}", err))
    }
}
