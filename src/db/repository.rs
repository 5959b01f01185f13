//! SQLite-backed employee repository.

use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, DbErrorKind, Employee, EmployeeChanges, EmployeeDraft, EmployeeStore, NewEmployee,
    schema,
};

/// How long a connection waits on a locked database, in milliseconds.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for employee operations.
///
/// Opens a fresh connection per call, so the handle is cheap to clone and
/// share across blocking tasks.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db_path: String,
}

impl EmployeeRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection. Call
    /// [`run_migrations`](Self::run_migrations) before use.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(
                DbErrorKind::Connection,
                "Database path must not be empty",
            ));
        }
        info!(path = %db_path, "Creating EmployeeRepository");
        Ok(Self { db_path })
    }

    /// Applies any pending migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self), fields(db_path = %self.db_path))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e))
        })?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Establishes a database connection.
    ///
    /// Writers from other connections are waited on for up to
    /// [`BUSY_TIMEOUT_MS`] instead of failing with `SQLITE_BUSY`.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}; PRAGMA journal_mode = WAL;"
        ))
        .map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to configure '{}': {}", self.db_path, e),
            )
        })?;
        Ok(conn)
    }
}

/// Escapes `LIKE` wildcards so the keyword matches literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl EmployeeStore for EmployeeRepository {
    #[instrument(skip(self))]
    fn list_active(&self) -> Result<Vec<Employee>, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let rows = employees
            .filter(is_active.eq(true))
            .order(id.asc())
            .select(Employee::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Active employees loaded");
        Ok(rows)
    }

    #[instrument(skip(self))]
    fn get(&self, employee_id: i32) -> Result<Option<Employee>, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let row = employees
            .find(employee_id)
            .select(Employee::as_select())
            .first(&mut conn)
            .optional()?;

        if row.is_none() {
            debug!("Employee not found");
        }
        Ok(row)
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let created = conn.immediate_transaction::<_, DbError, _>(|conn| {
            let taken = employees
                .filter(email.eq(&draft.email))
                .select(id)
                .first::<i32>(conn)
                .optional()?;
            if let Some(holder) = taken {
                warn!(holder, "Email already in use");
                return Err(DbError::duplicate_email(&draft.email));
            }

            let row = NewEmployee::from_draft(draft, Utc::now().naive_utc());
            let created = diesel::insert_into(employees)
                .values(&row)
                .returning(Employee::as_returning())
                .get_result(conn)?;
            Ok(created)
        })?;

        info!(employee_id = created.id(), "Employee created");
        Ok(created)
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    fn update(&self, employee_id: i32, draft: EmployeeDraft) -> Result<Employee, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let updated = conn.immediate_transaction::<_, DbError, _>(|conn| {
            let exists = employees
                .find(employee_id)
                .select(id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(DbError::not_found(employee_id));
            }

            let taken = employees
                .filter(email.eq(&draft.email))
                .filter(id.ne(employee_id))
                .select(id)
                .first::<i32>(conn)
                .optional()?;
            if let Some(holder) = taken {
                warn!(holder, "Email already used by another employee");
                return Err(DbError::duplicate_email(&draft.email));
            }

            let changes = EmployeeChanges::from_draft(draft, Utc::now().naive_utc());
            let row = diesel::update(employees.find(employee_id))
                .set(&changes)
                .returning(Employee::as_returning())
                .get_result(conn)?;
            Ok(row)
        })?;

        info!("Employee updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    fn deactivate(&self, employee_id: i32) -> Result<Employee, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let row = diesel::update(employees.find(employee_id))
            .set((
                is_active.eq(false),
                updated_at.eq(Some(Utc::now().naive_utc())),
            ))
            .returning(Employee::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(employee_id))?;

        info!(name = %row.name(), "Employee deactivated");
        Ok(row)
    }

    #[instrument(skip(self))]
    fn search(&self, keyword: &str) -> Result<Vec<Employee>, DbError> {
        use schema::employees::dsl::*;

        let pattern = like_pattern(keyword);
        let mut conn = self.connection()?;
        let rows = employees
            .filter(is_active.eq(true))
            .filter(
                name.like(&pattern)
                    .escape('\\')
                    .or(email.like(&pattern).escape('\\'))
                    .or(department.like(&pattern).escape('\\'))
                    .or(position.assume_not_null().like(&pattern).escape('\\')),
            )
            .order(name.asc())
            .select(Employee::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Search completed");
        Ok(rows)
    }

    #[instrument(skip(self))]
    fn departments(&self) -> Result<Vec<String>, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        let names = employees
            .filter(is_active.eq(true))
            .select(department)
            .distinct()
            .order(department.asc())
            .load::<String>(&mut conn)?;

        debug!(count = names.len(), "Departments loaded");
        Ok(names)
    }

    #[instrument(skip(self))]
    fn count(&self) -> Result<i64, DbError> {
        use schema::employees::dsl::*;

        let mut conn = self.connection()?;
        Ok(employees.count().get_result(&mut conn)?)
    }
}
