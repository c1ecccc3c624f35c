use serde_json::{json, Value};

use crate::middleware::ApiResponse;

/// POST /api/logout
///
/// Sessions are bearer tokens held by the client, so there is nothing to
/// tear down server-side; the client discards its token.
pub async fn logout() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "loggedOut": true }))
}
