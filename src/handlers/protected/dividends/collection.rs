use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::validate_new_dividend;
use crate::state::AppState;
use crate::storage::DividendRecord;

/// POST /api/dividends - Validate a full record body and store it (201)
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DividendRecord> {
    let Json(body) = payload?;
    let dividend = validate_new_dividend(&body)?;

    let record = state.storage.create_dividend(dividend).await;
    tracing::info!("Created dividend record {} ({})", record.id, record.ticker);

    Ok(ApiResponse::created(record))
}
