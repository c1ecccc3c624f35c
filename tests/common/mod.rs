#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use dividend_catalog::auth::AuthService;
use dividend_catalog::config::AppConfig;
use dividend_catalog::routes;
use dividend_catalog::state::AppState;
use dividend_catalog::storage::{MemStorage, NewUser};

pub const PASSWORD: &str = "password1";

/// In-process application wired to a fresh empty store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemStorage>,
    pub auth: Arc<AuthService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Start from the development preset with an empty store and fast hashing
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::development();
        config.store.seed_sample_data = false;
        config.security.bcrypt_cost = 4; // bcrypt minimum cost (bcrypt::MIN_COST is private)
        adjust(&mut config);

        let store = Arc::new(MemStorage::new(config.accounts.default_user_is_admin));
        let auth = Arc::new(AuthService::from_config(&config));
        let state = AppState::new(store.clone(), auth.clone(), Arc::new(config));

        Self {
            router: routes::app(state),
            store,
            auth,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string());
        self.raw_request(method, uri, token, body).await
    }

    /// Send a raw body string, for malformed-JSON cases
    pub async fn raw_request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register through the API and return the session token
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .post("/api/register", None, json!({ "username": username, "password": PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {}: {}", username, body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Create an account directly in the store with an explicit admin flag
    pub async fn user_token(&self, username: &str, is_admin: bool) -> String {
        let password = self.auth.hash_password(PASSWORD).await.unwrap();
        let user = self
            .store
            .create_user_as(
                NewUser {
                    username: username.to_string(),
                    password,
                },
                is_admin,
            )
            .await
            .unwrap();
        self.auth.issue_token(&user).unwrap()
    }

    pub async fn admin_token(&self) -> String {
        self.user_token("admin", true).await
    }
}

pub fn dividend_body(ticker: &str) -> Value {
    json!({
        "companyName": format!("{} PLC", ticker),
        "ticker": ticker,
        "sector": "Banking",
        "established": 1969,
        "quotedDate": 1970,
        "fyEnding": "December",
        "dividendAmount": "5.00",
        "frequency": "annual",
        "yearWiseData": ["2022:5.00", "2021:4.50"]
    })
}

/// Real server binary on a free port; killed when the value is dropped
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn the binary and wait until `/health` answers
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dividend-catalog"));
        cmd.env("APP_ENV", "development")
            .env("SERVER_HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("SECURITY_BCRYPT_COST", "4")
            .env("STORE_SEED_SAMPLE_DATA", "true")
            .env("ACCOUNTS_DEFAULT_USER_IS_ADMIN", "false")
            .env("ACCOUNTS_BOOTSTRAP_ADMIN", "operator:operator-pass")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
