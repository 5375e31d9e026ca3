use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod password;
pub mod service;

pub use service::{TokenError, TokenPair, TokenService};

/// Claims carried by every session (access) token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "accountId")]
    pub account_id: Uuid,
    pub email: String,
    pub organization: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(account_id: Uuid, email: String, organization: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            email,
            organization,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Claims carried by every refresh token. The extra `token_id` makes each
/// refresh token unique even for back-to-back issuances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "accountId")]
    pub account_id: Uuid,
    pub email: String,
    pub organization: String,
    #[serde(rename = "tokenId")]
    pub token_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl RefreshClaims {
    pub fn new(account_id: Uuid, email: String, organization: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            email,
            organization,
            token_id: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Immutable signing configuration injected into [`TokenService`] at
/// construction.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    /// Distinct refresh secret; falls back to `secret` when unset.
    pub refresh_secret: Option<String>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub fresh_auth_window: Duration,
}

impl TokenConfig {
    pub fn from_security(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            refresh_secret: security.refresh_token_secret.clone(),
            access_token_ttl: Duration::hours(security.access_token_expiry_hours as i64),
            refresh_token_ttl: Duration::days(security.refresh_token_expiry_days as i64),
            fresh_auth_window: Duration::minutes(security.fresh_auth_window_mins as i64),
        }
    }
}

/// Authenticated account context extracted from a verified session token,
/// attached to the request by the auth guards.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    #[serde(rename = "accountId")]
    pub account_id: Uuid,
    pub email: String,
    pub organization: String,
}

impl From<AccessClaims> for AuthUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            account_id: claims.account_id,
            email: claims.email,
            organization: claims.organization,
        }
    }
}

/// Age of a session established at `created_at`, measured from now.
pub fn session_age(created_at: DateTime<Utc>) -> Duration {
    Utc::now() - created_at
}
