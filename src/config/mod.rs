use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret used when nothing else is configured; accepted only in development
pub const DEVELOPMENT_JWT_SECRET: &str = "dividend-catalog-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub accounts: AccountsConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Admin flag given to every newly registered user
    pub default_user_is_admin: bool,
    pub allow_registration: bool,
    /// Optional `username:password` operator account created as admin at startup
    #[serde(skip_serializing)]
    pub bootstrap_admin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub seed_sample_data: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,

    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidBcryptCost(u32),

    #[error("ACCOUNTS_BOOTSTRAP_ADMIN must look like username:password")]
    InvalidBootstrapAdmin,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Account overrides
        if let Some(v) = lookup("ACCOUNTS_DEFAULT_USER_IS_ADMIN") {
            self.accounts.default_user_is_admin = v.parse().unwrap_or(self.accounts.default_user_is_admin);
        }
        if let Some(v) = lookup("ACCOUNTS_ALLOW_REGISTRATION") {
            self.accounts.allow_registration = v.parse().unwrap_or(self.accounts.allow_registration);
        }
        if let Some(v) = lookup("ACCOUNTS_BOOTSTRAP_ADMIN") {
            self.accounts.bootstrap_admin = Some(v).filter(|s| !s.is_empty());
        }

        // Store overrides
        if let Some(v) = lookup("STORE_SEED_SAMPLE_DATA") {
            self.store.seed_sample_data = v.parse().unwrap_or(self.store.seed_sample_data);
        }

        self
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty()
            || (self.environment != Environment::Development
                && self.security.jwt_secret == DEVELOPMENT_JWT_SECRET)
        {
            return Err(ConfigError::MissingJwtSecret);
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.security.bcrypt_cost));
        }
        if let Some(raw) = &self.accounts.bootstrap_admin {
            parse_bootstrap_admin(raw)?;
        }
        Ok(())
    }

    /// Operator account requested through `ACCOUNTS_BOOTSTRAP_ADMIN`
    pub fn bootstrap_admin(&self) -> Result<Option<(String, String)>, ConfigError> {
        self.accounts.bootstrap_admin.as_deref().map(parse_bootstrap_admin).transpose()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_cost: 10,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            accounts: AccountsConfig {
                default_user_is_admin: true,
                allow_registration: true,
                bootstrap_admin: None,
            },
            store: StoreConfig { seed_sample_data: true },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 12,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            accounts: AccountsConfig {
                default_user_is_admin: false,
                allow_registration: true,
                bootstrap_admin: None,
            },
            store: StoreConfig { seed_sample_data: false },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                bcrypt_cost: 12,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            accounts: AccountsConfig {
                default_user_is_admin: false,
                allow_registration: false,
                bootstrap_admin: None,
            },
            store: StoreConfig { seed_sample_data: false },
        }
    }
}

fn parse_bootstrap_admin(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once(':') {
        Some((user, password)) if !user.is_empty() && !password.is_empty() => {
            Ok((user.to_string(), password.to_string()))
        }
        _ => Err(ConfigError::InvalidBootstrapAdmin),
    }
}
