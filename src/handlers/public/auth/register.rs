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
use crate::storage::{NewUser, StoreError};

/// POST /api/register - Create an account and open a session
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "secret1" }
/// ```
///
/// Responds 201 with `{ "user": {...}, "token": "..." }`. The new user's
/// admin flag follows `ACCOUNTS_DEFAULT_USER_IS_ADMIN`.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    if !state.config.accounts.allow_registration {
        return Err(ApiError::forbidden("Registration is disabled"));
    }

    let Json(body) = payload?;
    let credentials = validate_credentials(&body)?;

    // Cheap pre-check so a taken name doesn't pay for a bcrypt hash; the store still enforces uniqueness
    if state.storage.get_user_by_username(&credentials.username).await.is_some() {
        return Err(StoreError::UsernameTaken(credentials.username).into());
    }

    let password = state.auth.hash_password(&credentials.password).await?;
    let user = state
        .storage
        .create_user(NewUser {
            username: credentials.username,
            password,
        })
        .await?;
    let token = state.auth.issue_token(&user)?;

    tracing::info!("Registered user {} ({}), admin={}", user.id, user.username, user.is_admin);

    Ok(ApiResponse::created(SessionResponse {
        user: user.into(),
        token,
    }))
}
