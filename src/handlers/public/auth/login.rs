use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use super::SessionResponse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::validate_credentials;
use crate::state::AppState;

/// POST /api/login - Exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(body) = payload?;
    let credentials = validate_credentials(&body)?;

    let user = state
        .storage
        .get_user_by_username(&credentials.username)
        .await
        .ok_or_else(invalid_credentials)?;

    if !state.auth.verify_password(&credentials.password, &user.password).await? {
        tracing::warn!("Failed login for user '{}'", credentials.username);
        return Err(invalid_credentials());
    }

    let token = state.auth.issue_token(&user)?;
    Ok(ApiResponse::success(SessionResponse {
        user: user.into(),
        token,
    }))
}

// Same message for unknown user and wrong password
fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid username or password")
}
