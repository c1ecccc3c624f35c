use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::storage::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<u32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token subject '{0}'")]
    InvalidSubject(String),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Credential hashing plus bearer-token issue and verification
#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: impl Into<String>, expiry_hours: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            token_expiration: Duration::hours(expiry_hours as i64),
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.security.jwt_secret.clone(),
            config.security.jwt_expiry_hours,
            config.security.bcrypt_cost,
        )
    }

    /// Hash on the blocking pool; bcrypt at production cost takes tens of milliseconds
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let hash = hash.to_string();
        Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (now + self.token_expiration).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            username: "alice".to_string(),
            password: String::new(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn password_round_trip() {
        let auth = AuthService::new("secret", 1, 4);
        let hash = auth.hash_password("secret1").await.unwrap();

        assert_ne!(hash, "secret1");
        assert!(auth.verify_password("secret1", &hash).await.unwrap());
        assert!(!auth.verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashing_leaves_the_runtime_responsive() {
        // Cost 13 takes hundreds of milliseconds; the single-threaded test
        // runtime must keep polling timers while it runs.
        let auth = AuthService::new("secret", 1, 13);
        let started = std::time::Instant::now();
        let hashing = tokio::spawn(async move { auth.hash_password("secret1").await });

        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(started.elapsed() < std::time::Duration::from_millis(200));

        assert!(hashing.await.unwrap().is_ok());
    }

    #[test]
    fn issued_token_verifies_and_carries_user_id() {
        let auth = AuthService::new("secret", 1, 4);
        let token = auth.issue_token(&user()).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 3);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new("one", 1, 4);
        let verifier = AuthService::new("two", 1, 4);
        let token = issuer.issue_token(&user()).unwrap();

        assert!(matches!(verifier.verify_token(&token), Err(AuthError::InvalidToken(_))));
        assert!(verifier.verify_token("not-a-jwt").is_err());
    }
}
