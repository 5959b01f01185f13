//! Lab APIs library - guessing game, calculator and employee directory over HTTP
//!
//! # Architecture
//!
//! - **Session**: guessing-game sessions scored by [`lab_guess`]
//! - **Calculator**: decimal arithmetic
//! - **Db**: employee storage (SQLite via diesel, or in memory)
//! - **Server**: axum router tying the three APIs together
//!
//! # Example
//!
//! ```no_run
//! use lab_apis::{AppState, InMemoryEmployeeStore, SessionManager, app_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let state = AppState::new(
//!     SessionManager::new(),
//!     Arc::new(InMemoryEmployeeStore::new()),
//!     true,
//! );
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! lab_apis::serve(listener, state).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod calculator;
mod config;
mod db;
mod error;
mod routes;
mod server;
mod session;

// Crate-level exports - Calculator
pub use calculator::{CalcError, Operation};

// Crate-level exports - Configuration
pub use config::{ConfigError, IN_MEMORY_DB, ServerConfig};

// Crate-level exports - Employee storage
pub use db::{
    DbError, DbErrorKind, Employee, EmployeeDraft, EmployeeForm, EmployeeRepository,
    EmployeeStore, FieldError, InMemoryEmployeeStore, MIGRATIONS, ValidationError,
    sample_employees,
};

// Crate-level exports - HTTP
pub use error::{ApiError, ErrorBody};
pub use routes::calculator::{CalcRequest, CalcResponse};
pub use routes::employees::{DeactivateResponse, SearchParams};
pub use routes::game::{GuessRequest, GuessResponse, HistoryResponse, NewGameRequest, NewGameResponse};
pub use routes::HealthResponse;
pub use server::{AppState, app_router, serve, spawn_session_sweeper};

// Crate-level exports - Session management
pub use session::{
    Attempt, GameId, GameSession, GuessOutcome, SessionError, SessionManager, SessionSnapshot,
};
