use crate::middleware::{ApiResponse, AuthUser};

/// GET /api/user - The current session's user; 401 when anonymous
pub async fn whoami(user: AuthUser) -> ApiResponse<AuthUser> {
    ApiResponse::success(user)
}
