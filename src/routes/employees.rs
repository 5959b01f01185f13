//! Employee CRUD endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::db::{DbError, Employee, EmployeeForm};
use crate::error::ApiError;
use crate::routes::{blocking, parse_json};
use crate::server::AppState;

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Substring to look for.
    pub keyword: Option<String>,
}

/// Reply to a soft delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeactivateResponse {
    /// Always `true`.
    pub success: bool,
    /// Confirmation naming the employee.
    pub message: String,
}

/// Lists active employees.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    let store = state.employees.clone();
    let rows = blocking(move || store.list_active()).await?;
    Ok(Json(rows))
}

/// Fetches one employee, active or not.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Employee>, ApiError> {
    let store = state.employees.clone();
    let row = blocking(move || store.get(id)?.ok_or_else(|| DbError::not_found(id))).await?;
    Ok(Json(row))
}

/// Creates an employee and points `Location` at it.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let form: EmployeeForm = parse_json(&body)?;
    let draft = form.validate()?;

    let store = state.employees.clone();
    let created = blocking(move || store.create(draft)).await?;
    info!(employee_id = created.id(), "Employee added");

    let location = format!("/api/employees/{}", created.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Replaces an employee's editable fields.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<Employee>, ApiError> {
    let form: EmployeeForm = parse_json(&body)?;
    if let Some(body_id) = form.id.filter(|body_id| *body_id != id) {
        return Err(ApiError::IdMismatch {
            path_id: id,
            body_id,
        });
    }
    let draft = form.validate()?;

    let store = state.employees.clone();
    let updated = blocking(move || store.update(id, draft)).await?;
    Ok(Json(updated))
}

/// Soft-deletes an employee.
#[instrument(skip(state))]
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let store = state.employees.clone();
    let row = blocking(move || store.deactivate(id)).await?;

    Ok(Json(DeactivateResponse {
        success: true,
        message: format!("Employee {} marked as inactive", row.name()),
    }))
}

/// Keyword search over active employees.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let keyword = params
        .keyword
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ApiError::MissingKeyword)?;

    let store = state.employees.clone();
    let rows = blocking(move || store.search(&keyword)).await?;
    Ok(Json(rows))
}

/// Distinct departments of active employees.
#[instrument(skip(state))]
pub async fn departments(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.employees.clone();
    let names = blocking(move || store.departments()).await?;
    Ok(Json(names))
}
