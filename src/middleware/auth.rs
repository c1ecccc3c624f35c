use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::User;

/// Authenticated principal resolved from the bearer token.
///
/// The admin flag is read from the store on every request, never from the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: u32,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

/// Resolve the session for every request.
///
/// A valid token whose user still exists attaches an [`AuthUser`] to the
/// request extensions. Anything else leaves the request anonymous; the
/// access gate decides later whether that matters.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(user) = resolve_session(&state, request.headers()).await {
        tracing::debug!("Session resolved for user {} ({})", user.id, user.username);
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_bearer_token(headers)?;

    let user_id = match state.auth.verify_token(token).and_then(|claims| claims.user_id()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Ignoring bearer token: {}", e);
            return None;
        }
    };

    let user = state.storage.get_user(user_id).await;
    if user.is_none() {
        tracing::warn!("Ignoring bearer token for unknown user {}", user_id);
    }
    user.map(AuthUser::from)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Handlers that take an `AuthUser` reject anonymous requests with 401
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&headers("Basic abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn session_requires_live_user() {
        let ctx = crate::testing::TestContext::new().await;

        let resolved = resolve_session(&ctx.state, &headers(&format!("Bearer {}", ctx.admin_token))).await;
        assert_eq!(resolved.map(|u| u.is_admin), Some(true));

        let stale = ctx.token_for_missing_user();
        assert!(resolve_session(&ctx.state, &headers(&format!("Bearer {}", stale))).await.is_none());
        assert!(resolve_session(&ctx.state, &headers("Bearer garbage")).await.is_none());
    }
}
