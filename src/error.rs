//! HTTP error mapping.
//!
//! Every failure leaves the API as the same JSON shape:
//!
//! ```json
//! { "success": false, "code": "NOT_FOUND", "message": "...", "details": [...] }
//! ```
//!
//! `details` is present only for field validation failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::calculator::CalcError;
use crate::db::{DbError, DbErrorKind, FieldError, ValidationError};
use crate::session::SessionError;

/// Body returned with every error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Any error a handler can return.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// Guessing-game failure.
    #[display("{source}")]
    #[from]
    Session {
        /// Underlying error.
        source: SessionError,
    },
    /// Calculator failure.
    #[display("{source}")]
    #[from]
    Calc {
        /// Underlying error.
        source: CalcError,
    },
    /// Storage failure.
    #[display("{source}")]
    #[from]
    Db {
        /// Underlying error.
        source: DbError,
    },
    /// Employee form failed validation.
    #[display("{source}")]
    #[from]
    Validation {
        /// Underlying error.
        source: ValidationError,
    },
    /// Request body was not valid JSON for the endpoint.
    #[display("Malformed request body: {source}")]
    #[from]
    Json {
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Path named an operation the calculator does not have.
    #[display("Unknown calculator operation '{name}'")]
    UnknownOperation {
        /// The unrecognised path segment.
        name: String,
    },
    /// Body id disagrees with path id on update.
    #[display("Path id {path_id} does not match body id {body_id}")]
    IdMismatch {
        /// Id from the URL.
        path_id: i32,
        /// Id from the body.
        body_id: i32,
    },
    /// Search was called without a keyword.
    #[display("Please provide a search keyword")]
    MissingKeyword,
    /// A blocking task panicked or was cancelled.
    #[display("Background task failed: {source}")]
    #[from]
    Join {
        /// Underlying error.
        source: tokio::task::JoinError,
    },
}

impl ApiError {
    /// HTTP status and stable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Session { source } => match source {
                SessionError::EmptyGuess
                | SessionError::InvalidCode { .. }
                | SessionError::DuplicateDigits { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_GUESS")
                }
                SessionError::NotFound { .. } => (StatusCode::NOT_FOUND, "GAME_NOT_FOUND"),
                SessionError::Completed { .. } => (StatusCode::CONFLICT, "GAME_COMPLETED"),
                SessionError::RepeatedSecret | SessionError::Poisoned => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
                }
            },
            Self::Calc { source } => match source {
                CalcError::DivideByZero => (StatusCode::BAD_REQUEST, "DIVIDE_BY_ZERO"),
                CalcError::Overflow { .. } => (StatusCode::BAD_REQUEST, "OVERFLOW"),
            },
            Self::Db { source } => match source.kind {
                DbErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                DbErrorKind::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
                DbErrorKind::Connection
                | DbErrorKind::Migration
                | DbErrorKind::Query
                | DbErrorKind::InvalidRecord
                | DbErrorKind::Poisoned => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            },
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Json { .. } => (StatusCode::BAD_REQUEST, "MALFORMED_BODY"),
            Self::UnknownOperation { .. } => (StatusCode::NOT_FOUND, "UNKNOWN_OPERATION"),
            Self::IdMismatch { .. } => (StatusCode::BAD_REQUEST, "ID_MISMATCH"),
            Self::MissingKeyword => (StatusCode::BAD_REQUEST, "MISSING_KEYWORD"),
            Self::Join { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }

    /// Message safe to show a client; internal details stay in the logs.
    fn public_message(&self, status: StatusCode) -> String {
        if status.is_server_error() {
            "Internal server error".to_string()
        } else if let Self::Db { source } = self {
            source.message.clone()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self, code, "Request failed");
        } else {
            warn!(error = %self, code, "Request rejected");
        }

        let details = match &self {
            Self::Validation { source } => Some(source.fields.clone()),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            code: code.to_string(),
            message: self.public_message(status),
            details,
        };
        (status, Json(body)).into_response()
    }
}
