use std::sync::Arc;

use tracing::info;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::handlers::protected::dividends::YearWriter;
use crate::storage::{MemStorage, NewUser, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub auth: Arc<AuthService>,
    pub config: Arc<AppConfig>,
    pub year_writer: Arc<YearWriter>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, auth: Arc<AuthService>, config: Arc<AppConfig>) -> Self {
        Self {
            storage,
            auth,
            config,
            year_writer: Arc::new(YearWriter::new()),
        }
    }

    /// Build the store and services described by `config`, creating the
    /// bootstrap operator account when one is configured.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = if config.store.seed_sample_data {
            MemStorage::with_sample_data(config.accounts.default_user_is_admin)
        } else {
            MemStorage::new(config.accounts.default_user_is_admin)
        };
        let auth = AuthService::from_config(&config);

        if let Some((username, password)) = config.bootstrap_admin()? {
            let password = auth.hash_password(&password).await?;
            let admin = store.create_user_as(NewUser { username, password }, true).await?;
            info!("Bootstrap admin '{}' created with id {}", admin.username, admin.id);
        }

        Ok(Self::new(Arc::new(store), Arc::new(auth), Arc::new(config)))
    }
}
