use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// What the gate needs to know about a request's session
pub trait SessionContext {
    fn is_authenticated(&self) -> bool;
    fn is_admin(&self) -> bool;
}

impl SessionContext for Option<&AuthUser> {
    fn is_authenticated(&self) -> bool {
        self.is_some()
    }

    fn is_admin(&self) -> bool {
        self.map_or(false, |user| user.is_admin)
    }
}

/// Gate decision for admin-only operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Proceed,
    Unauthenticated,
    Forbidden,
}

pub fn authorize(session: &impl SessionContext) -> Access {
    if !session.is_authenticated() {
        Access::Unauthenticated
    } else if !session.is_admin() {
        Access::Forbidden
    } else {
        Access::Proceed
    }
}

/// Route layer for dividend-mutating endpoints: 401 without a session, 403 for non-admins
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let session = request.extensions().get::<AuthUser>().cloned();

    match authorize(&session.as_ref()) {
        Access::Proceed => Ok(next.run(request).await),
        Access::Unauthenticated => Err(ApiError::unauthorized("Authentication required")),
        Access::Forbidden => {
            if let Some(user) = session {
                tracing::warn!("Admin access denied for user {} ({})", user.id, user.username);
            }
            Err(ApiError::forbidden("Admin access required"))
        }
    }
}
