//! Calculator endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::calculator::Operation;
use crate::error::ApiError;
use crate::routes::parse_json;

/// Operands of a calculation. Numbers or numeric strings are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcRequest {
    /// Left operand.
    pub first_number: Decimal,
    /// Right operand.
    pub second_number: Decimal,
}

/// Result of a calculation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcResponse {
    /// The exact computed value, as a decimal string.
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub result: Decimal,
    /// Human-readable operation name.
    pub operation: &'static str,
    /// Always `true`.
    pub success: bool,
}

/// Applies the operation named in the path to the body's operands.
#[instrument(skip(body))]
pub async fn calculate(
    Path(op): Path<String>,
    body: Bytes,
) -> Result<Json<CalcResponse>, ApiError> {
    let operation: Operation = op
        .parse()
        .map_err(|_| ApiError::UnknownOperation { name: op.clone() })?;
    let request: CalcRequest = parse_json(&body)?;

    let result = operation.apply(request.first_number, request.second_number)?;
    debug!(%operation, %result, "Calculated");

    Ok(Json(CalcResponse {
        result,
        operation: operation.label(),
        success: true,
    }))
}
