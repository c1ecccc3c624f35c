use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::{DividendPatch, DividendRecord, NewDividend, NewUser, User};
use super::{seed, Storage, StoreError};

/// Id-indexed tables plus their allocation counters.
///
/// Ids are allocated monotonically and never reused, so iterating the
/// `BTreeMap` yields insertion order.
#[derive(Debug)]
struct Tables {
    users: BTreeMap<u32, User>,
    dividends: BTreeMap<u32, DividendRecord>,
    next_user_id: u32,
    next_dividend_id: u32,
}

impl Tables {
    fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            dividends: BTreeMap::new(),
            next_user_id: 1,
            next_dividend_id: 1,
        }
    }

    fn insert_user(&mut self, user: NewUser, is_admin: bool) -> Result<User, StoreError> {
        if self.users.values().any(|existing| existing.username == user.username) {
            return Err(StoreError::UsernameTaken(user.username));
        }

        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = User {
            id,
            username: user.username,
            password: user.password,
            is_admin,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn insert_dividend(&mut self, dividend: NewDividend) -> DividendRecord {
        let id = self.next_dividend_id;
        self.next_dividend_id += 1;

        let record = DividendRecord::from_new(id, dividend, Utc::now());
        self.dividends.insert(id, record.clone());
        record
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Debug)]
pub struct MemStorage {
    tables: RwLock<Tables>,
    default_user_is_admin: bool,
}

impl MemStorage {
    /// Empty store. `default_user_is_admin` decides the admin flag of every
    /// user created through [`Storage::create_user`].
    pub fn new(default_user_is_admin: bool) -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
            default_user_is_admin,
        }
    }

    /// Store pre-populated with the sample listed companies
    pub fn with_sample_data(default_user_is_admin: bool) -> Self {
        let mut tables = Tables::new();
        for dividend in seed::sample_dividends() {
            tables.insert_dividend(dividend);
        }
        info!("Seeded {} sample dividend records", tables.dividends.len());

        Self {
            tables: RwLock::new(tables),
            default_user_is_admin,
        }
    }

    /// Create a user with an explicit admin flag, bypassing the default
    /// policy. Used to bootstrap an operator account at startup.
    pub async fn create_user_as(&self, user: NewUser, is_admin: bool) -> Result<User, StoreError> {
        self.tables.write().await.insert_user(user, is_admin)
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: u32) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = self.tables.write().await.insert_user(user, self.default_user_is_admin)?;
        debug!("Created user {} ({}), admin={}", user.id, user.username, user.is_admin);
        Ok(user)
    }

    async fn get_all_dividends(&self) -> Vec<DividendRecord> {
        self.tables.read().await.dividends.values().cloned().collect()
    }

    async fn get_dividend(&self, id: u32) -> Option<DividendRecord> {
        self.tables.read().await.dividends.get(&id).cloned()
    }

    async fn create_dividend(&self, dividend: NewDividend) -> DividendRecord {
        self.tables.write().await.insert_dividend(dividend)
    }

    async fn update_dividend(&self, id: u32, patch: DividendPatch) -> Result<DividendRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let record = tables.dividends.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.apply(patch, Utc::now());
        Ok(record.clone())
    }

    async fn delete_dividend(&self, id: u32) {
        self.tables.write().await.dividends.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{Frequency, YearAmount};
    use rust_decimal::Decimal;

    fn sample(company: &str) -> NewDividend {
        NewDividend {
            company_name: company.to_string(),
            ticker: company.chars().take(4).collect::<String>().to_uppercase(),
            sector: "Banking".to_string(),
            established: 1969,
            quoted_date: 1970,
            fy_ending: "December".to_string(),
            dividend_amount: Decimal::new(650, 2),
            frequency: Frequency::Annual,
            year_wise_data: vec![YearAmount::new(2023, Decimal::new(650, 2))],
        }
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_input_with_id_and_timestamp() {
        let store = MemStorage::new(false);
        let started = Utc::now();

        let created = store.create_dividend(sample("Commercial Bank PLC")).await;
        let fetched = store.get_dividend(created.id).await.unwrap();

        assert_eq!(created.id, 1);
        assert!(fetched.last_updated >= started);
        assert_eq!(fetched, DividendRecord::from_new(created.id, sample("Commercial Bank PLC"), fetched.last_updated));
    }

    #[tokio::test]
    async fn ids_are_sequential_and_listing_keeps_insertion_order() {
        let store = MemStorage::new(false);
        for name in ["Zeta", "Alpha", "Mid"] {
            store.create_dividend(sample(name)).await;
        }

        let all = store.get_all_dividends().await;
        let ids: Vec<u32> = all.iter().map(|r| r.id).collect();
        let names: Vec<&str> = all.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemStorage::new(false);
        let first = store.create_dividend(sample("First")).await;
        store.delete_dividend(first.id).await;

        let second = store.create_dividend(sample("Second")).await;
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn empty_update_only_refreshes_timestamp() {
        let store = MemStorage::new(false);
        let created = store.create_dividend(sample("DFCC Bank PLC")).await;

        let updated = store.update_dividend(created.id, DividendPatch::default()).await.unwrap();

        assert!(updated.last_updated >= created.last_updated);
        assert_eq!(DividendRecord { last_updated: created.last_updated, ..updated }, created);
    }

    #[tokio::test]
    async fn partial_update_merges_supplied_fields() {
        let store = MemStorage::new(false);
        let created = store.create_dividend(sample("Hatton National Bank PLC")).await;

        let patch = DividendPatch {
            sector: Some("Finance".to_string()),
            dividend_amount: Some(Decimal::new(875, 2)),
            ..Default::default()
        };
        let updated = store.update_dividend(created.id, patch).await.unwrap();

        assert_eq!(updated.sector, "Finance");
        assert_eq!(updated.dividend_amount.to_string(), "8.75");
        assert_eq!(updated.company_name, created.company_name);
        assert_eq!(updated.year_wise_data, created.year_wise_data);
        assert_eq!(store.get_dividend(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let store = MemStorage::new(false);
        let err = store.update_dividend(42, DividendPatch::default()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(42));
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_missing_ids_are_ignored() {
        let store = MemStorage::new(false);
        let created = store.create_dividend(sample("Ceylon Tobacco")).await;

        store.delete_dividend(created.id).await;
        assert!(store.get_dividend(created.id).await.is_none());

        store.delete_dividend(created.id).await;
        store.delete_dividend(999).await;
        assert!(store.get_dividend(created.id).await.is_none());
        assert!(store.get_all_dividends().await.is_empty());
    }

    #[tokio::test]
    async fn create_user_applies_default_admin_policy() {
        let admins = MemStorage::new(true);
        let alice = admins.create_user(new_user("alice")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert!(alice.is_admin);

        let regular = MemStorage::new(false);
        let bob = regular.create_user(new_user("bob")).await.unwrap();
        assert!(!bob.is_admin);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemStorage::new(false);
        store.create_user(new_user("alice")).await.unwrap();

        let err = store.create_user(new_user("alice")).await.unwrap_err();
        assert_eq!(err, StoreError::UsernameTaken("alice".to_string()));

        let next = store.create_user(new_user("carol")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn users_are_found_by_id_and_exact_username() {
        let store = MemStorage::new(false);
        let alice = store.create_user(new_user("alice")).await.unwrap();

        assert_eq!(store.get_user(alice.id).await, Some(alice.clone()));
        assert_eq!(store.get_user_by_username("alice").await, Some(alice));
        assert!(store.get_user_by_username("Alice").await.is_none());
        assert!(store.get_user(99).await.is_none());
    }

    #[tokio::test]
    async fn create_user_as_overrides_policy() {
        let store = MemStorage::new(false);
        let root = store.create_user_as(new_user("root"), true).await.unwrap();
        assert!(root.is_admin);
        assert!(store.create_user_as(new_user("root"), false).await.is_err());
    }

    #[tokio::test]
    async fn sample_data_is_seeded_in_order() {
        let store = MemStorage::with_sample_data(false);
        let all = store.get_all_dividends().await;

        let tickers: Vec<&str> = all.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SAMP", "COMB", "DFCC", "HNB", "CTC"]);

        let next = store.create_dividend(sample("Another")).await;
        assert_eq!(next.id, 6);
    }
}
