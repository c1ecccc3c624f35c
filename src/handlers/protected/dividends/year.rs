use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::validate_year_entry;
use crate::state::AppState;
use crate::storage::models::replace_year;
use crate::storage::{DividendPatch, DividendRecord, Storage, StoreError, YearAmount};

/// POST /api/dividends/:id/year - Set the payout for one year
///
/// Expected Input:
/// ```json
/// { "year": 2022, "amount": "7.00" }
/// ```
pub async fn append_year(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DividendRecord> {
    let Path(id) = path?;
    let Json(body) = payload?;
    let entry = validate_year_entry(&body)?;

    let record = state.year_writer.append(state.storage.as_ref(), id, entry).await?;
    tracing::info!("Recorded {} for dividend record {}", entry, id);

    Ok(ApiResponse::success(record))
}

/// Runs append-year one request at a time.
///
/// Append-year is a fetch followed by a plain update; without this lock two
/// concurrent appends can read the same history and the later write drops
/// the earlier entry.
#[derive(Debug, Default)]
pub struct YearWriter {
    lock: Mutex<()>,
}

impl YearWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, storage: &dyn Storage, id: u32, entry: YearAmount) -> Result<DividendRecord, StoreError> {
        let _guard = self.lock.lock().await;
        append_year_data(storage, id, entry).await
    }
}

/// Drop any existing entry for `entry.year`, append `entry` last, and store
/// the result through a plain partial update.
async fn append_year_data(storage: &dyn Storage, id: u32, entry: YearAmount) -> Result<DividendRecord, StoreError> {
    let current = storage.get_dividend(id).await.ok_or(StoreError::NotFound(id))?;
    let year_wise_data = replace_year(&current.year_wise_data, entry);

    storage
        .update_dividend(id, DividendPatch::year_wise_data(year_wise_data))
        .await
}
