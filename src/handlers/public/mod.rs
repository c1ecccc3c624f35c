pub mod auth;
pub mod dividends;
