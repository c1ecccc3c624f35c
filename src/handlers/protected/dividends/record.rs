use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;

use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::validate_dividend_patch;
use crate::state::AppState;
use crate::storage::DividendRecord;

/// PATCH /api/dividends/:id - Merge a partial body over the stored record
///
/// The body is validated before the store is consulted, so an invalid body
/// for a missing id is a 400, not a 404.
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DividendRecord> {
    let Path(id) = path?;
    let Json(body) = payload?;
    let patch = validate_dividend_patch(&body)?;

    let record = state.storage.update_dividend(id, patch).await?;
    tracing::info!("Updated dividend record {}", id);

    Ok(ApiResponse::success(record))
}

/// DELETE /api/dividends/:id - Always 204, whether or not the id existed
pub async fn delete(State(state): State<AppState>, path: Result<Path<u32>, PathRejection>) -> ApiResult<()> {
    let Path(id) = path?;
    state.storage.delete_dividend(id).await;
    tracing::info!("Deleted dividend record {}", id);

    Ok(ApiResponse::no_content())
}
