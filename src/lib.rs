pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;
