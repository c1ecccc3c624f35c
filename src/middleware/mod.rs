pub mod auth;
pub mod gate;
pub mod response;

pub use auth::{session_middleware, AuthUser};
pub use gate::{authorize, require_admin, Access, SessionContext};
pub use response::{ApiResponse, ApiResult};
