//! Session tokens and password hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::domain::UserId;
use thiserror::Error;

/// Name of the HTTP-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "jwt";

pub const DEFAULT_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
/// Longest accepted session lifetime, one year.
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "devsecret".into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token subject is not a user: {0}")]
    Subject(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("session lifetime of {0}s is outside 1..={MAX_TTL_SECONDS}")]
    Ttl(i64),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub fn mint_token(cfg: &AuthConfig, user_id: UserId) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = Some(cfg.ttl_seconds)
        .filter(|ttl| (1..=MAX_TTL_SECONDS).contains(ttl))
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(AuthError::Ttl(cfg.ttl_seconds))?;
    let claims = Claims {
        sub: format!("user:{}", user_id.0),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?)
}

pub fn verify_token(cfg: &AuthConfig, token: &str) -> Result<UserId, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    data.claims
        .sub
        .strip_prefix("user:")
        .and_then(|id| id.parse::<i64>().ok())
        .map(UserId)
        .ok_or_else(|| AuthError::Subject(data.claims.sub.clone()))
}

/// Hashes a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Returns `false` for a wrong password and for an unparseable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
