use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::storage::DividendRecord;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("{message} ({code}, HTTP {status})")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Thin typed wrapper over the catalog's HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        // Url::join replaces the last segment unless the base path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            token,
            http: Client::new(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|_| ClientError::InvalidUrl(format!("{}{}", self.base, path)))
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Value, ClientError> {
        let body = json!({ "username": username, "password": password });
        self.send(Method::POST, "api/register", Some(&body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Value, ClientError> {
        let body = json!({ "username": username, "password": password });
        self.send(Method::POST, "api/login", Some(&body)).await
    }

    pub async fn whoami(&self) -> Result<Value, ClientError> {
        self.send(Method::GET, "api/user", None).await
    }

    pub async fn list_dividends(&self) -> Result<Vec<DividendRecord>, ClientError> {
        self.send(Method::GET, "api/dividends", None).await
    }

    pub async fn get_dividend(&self, id: u32) -> Result<DividendRecord, ClientError> {
        self.send(Method::GET, &format!("api/dividends/{}", id), None).await
    }

    pub async fn create_dividend(&self, body: &Value) -> Result<DividendRecord, ClientError> {
        self.send(Method::POST, "api/dividends", Some(body)).await
    }

    pub async fn update_dividend(&self, id: u32, body: &Value) -> Result<DividendRecord, ClientError> {
        self.send(Method::PATCH, &format!("api/dividends/{}", id), Some(body)).await
    }

    pub async fn add_year(&self, id: u32, year: i32, amount: &str) -> Result<DividendRecord, ClientError> {
        let body = json!({ "year": year, "amount": amount });
        self.send(Method::POST, &format!("api/dividends/{}/year", id), Some(&body)).await
    }

    pub async fn delete_dividend(&self, id: u32) -> Result<(), ClientError> {
        self.execute(Method::DELETE, &format!("api/dividends/{}", id), None).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<&Value>) -> Result<T, ClientError> {
        let text = self.execute(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Perform the request and return the raw body of a successful response
    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<String, ClientError> {
        let mut request = self.http.request(method, self.endpoint(path)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(api_error(status, &text))
        }
    }
}

/// Decode the server's `{ message, code }` error body, falling back to the raw text
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let mut message = field("message").unwrap_or_else(|| body.trim().to_string());
    if let Some(Value::Object(errors)) = parsed.as_ref().and_then(|v| v.get("field_errors")) {
        let mut details: Vec<String> = errors
            .iter()
            .map(|(field, error)| format!("{}: {}", field, error.as_str().unwrap_or_default()))
            .collect();
        details.sort();
        message = format!("{} [{}]", message, details.join("; "));
    }

    ClientError::Api {
        status,
        code: field("code").unwrap_or_else(|| "HTTP_ERROR".to_string()),
        message,
    }
}
