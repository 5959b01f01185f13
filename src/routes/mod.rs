//! HTTP handlers, one module per API.

pub mod calculator;
pub mod employees;
pub mod game;

use axum::Json;
use axum::body::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::db::DbError;
use crate::error::ApiError;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Decodes a JSON body so that syntax errors share the API error shape.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

/// Runs a synchronous store call on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
