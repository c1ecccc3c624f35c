use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::state::AppState;
use crate::storage::{MemStorage, NewUser, User};

/// In-process application state with one admin and one regular user
pub struct TestContext {
    pub state: AppState,
    pub admin_token: String,
    pub user_token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let mut config = AppConfig::development();
        config.accounts.default_user_is_admin = false;
        config.store.seed_sample_data = false;
        config.security.bcrypt_cost = 4;

        let auth = AuthService::from_config(&config);
        let store = Arc::new(MemStorage::new(config.accounts.default_user_is_admin));

        let admin = Self::create_user(&store, &auth, "admin", true).await;
        let user = Self::create_user(&store, &auth, "viewer", false).await;
        let admin_token = auth.issue_token(&admin).expect("admin token");
        let user_token = auth.issue_token(&user).expect("user token");

        let state = AppState::new(store, Arc::new(auth), Arc::new(config));

        Self {
            state,
            admin_token,
            user_token,
        }
    }

    /// A correctly signed token whose user id was never allocated
    pub fn token_for_missing_user(&self) -> String {
        let ghost = User {
            id: 9_999,
            username: "ghost".to_string(),
            password: String::new(),
            is_admin: true,
        };
        self.state.auth.issue_token(&ghost).expect("ghost token")
    }

    async fn create_user(store: &MemStorage, auth: &AuthService, username: &str, is_admin: bool) -> User {
        let password = auth.hash_password("password1").await.expect("hash");
        store
            .create_user_as(
                NewUser {
                    username: username.to_string(),
                    password,
                },
                is_admin,
            )
            .await
            .expect("test user")
    }
}
