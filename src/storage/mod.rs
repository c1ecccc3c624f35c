pub mod memory;
pub mod models;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemStorage;
pub use models::{DividendPatch, DividendRecord, Frequency, NewDividend, NewUser, User, YearAmount};

/// The only failures the record store can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Dividend record {0} not found")]
    NotFound(u32),

    #[error("Username '{0}' already exists")]
    UsernameTaken(String),
}

/// Data-access layer for users and dividend records.
///
/// Lookups of absent ids return `None` rather than an error. Every method
/// hands back owned copies; callers never hold references into the store.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: u32) -> Option<User>;

    /// First user whose username matches exactly
    async fn get_user_by_username(&self, username: &str) -> Option<User>;

    /// Register a user; the admin flag comes from the store's policy
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// All records in insertion order
    async fn get_all_dividends(&self) -> Vec<DividendRecord>;

    async fn get_dividend(&self, id: u32) -> Option<DividendRecord>;

    async fn create_dividend(&self, dividend: NewDividend) -> DividendRecord;

    /// Merge `patch` over the stored record and refresh `last_updated`
    async fn update_dividend(&self, id: u32, patch: DividendPatch) -> Result<DividendRecord, StoreError>;

    /// Remove a record; absent ids are ignored
    async fn delete_dividend(&self, id: u32);
}
