use serde::Serialize;

use crate::middleware::AuthUser;

pub mod login;
pub mod logout;
pub mod register;

pub use login::login;
pub use logout::logout;
pub use register::register;

/// Body returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: AuthUser,
    pub token: String,
}
