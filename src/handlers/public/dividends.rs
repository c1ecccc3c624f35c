use axum::extract::{rejection::PathRejection, Path, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::DividendRecord;

/// GET /api/dividends - Every record in insertion order; no session required
pub async fn list(State(state): State<AppState>) -> ApiResponse<Vec<DividendRecord>> {
    ApiResponse::success(state.storage.get_all_dividends().await)
}

/// GET /api/dividends/:id
pub async fn get(State(state): State<AppState>, path: Result<Path<u32>, PathRejection>) -> ApiResult<DividendRecord> {
    let Path(id) = path?;
    state
        .storage
        .get_dividend(id)
        .await
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Dividend record {} not found", id)))
}
