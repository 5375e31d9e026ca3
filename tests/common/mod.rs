//! Shared harness for the integration tests: an app router wired to
//! in-memory stores, plus request helpers. No database or network involved.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use syncline_api::app::{router, AppState};
use syncline_api::auth::{TokenConfig, TokenService};
use syncline_api::database::models::{Account, NewAccount, TokenRecord};
use syncline_api::database::store::{CredentialStore, StoreError, TokenStore, DEFAULT_SLOT};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub app: Router,
    pub tokens: Arc<MemoryTokenStore>,
    pub credentials: Arc<MemoryCredentialStore>,
}

/// Build the full router against in-memory stores.
pub fn test_app() -> TestApp {
    let tokens = Arc::new(MemoryTokenStore::default());
    let credentials = Arc::new(MemoryCredentialStore::default());

    let config = TokenConfig {
        secret: TEST_SECRET.to_string(),
        refresh_secret: None,
        access_token_ttl: Duration::hours(24),
        refresh_token_ttl: Duration::days(7),
        fresh_auth_window: Duration::minutes(15),
    };

    let state = AppState::with_stores(
        credentials.clone(),
        TokenService::new(tokens.clone(), config),
    );

    TestApp {
        app: router(state),
        tokens,
        credentials,
    }
}

impl TestApp {
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_authed(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Run the signup flow and hand back (accessToken, refreshToken).
    pub async fn signup(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .post_json(
                "/auth/signup",
                serde_json::json!({
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": email,
                    "password": "longenough1",
                    "organization": "Initech",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
}

/// In-memory [`TokenStore`] mirroring the Postgres upsert semantics.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: Mutex<HashMap<(Uuid, String), TokenRecord>>,
}

impl MemoryTokenStore {
    /// Backdate a session to test recency windows.
    pub fn backdate(&self, account_id: Uuid, age: Duration) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&(account_id, DEFAULT_SLOT.to_string())) {
            record.created_at = Utc::now() - age;
        }
    }

    pub fn account_id_for_slot(&self) -> Option<Uuid> {
        let records = self.records.lock().unwrap();
        records.keys().next().map(|(id, _)| *id)
    }

    pub fn record(&self, account_id: Uuid) -> Option<TokenRecord> {
        let records = self.records.lock().unwrap();
        records.get(&(account_id, DEFAULT_SLOT.to_string())).cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn upsert(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.insert(
            (account_id, slot.to_string()),
            TokenRecord {
                account_id,
                slot: slot.to_string(),
                access_token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
                created_at: Utc::now(),
                last_used: Utc::now(),
            },
        );
        Ok(())
    }

    async fn find(&self, account_id: Uuid, slot: &str) -> Result<Option<TokenRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&(account_id, slot.to_string())).cloned())
    }

    async fn update_access_token(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&(account_id, slot.to_string())) {
            record.access_token = access_token.to_string();
        }
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.retain(|(id, _), _| *id != account_id);
        Ok(())
    }

    async fn touch_last_used(&self, account_id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        for ((id, _), record) in records.iter_mut() {
            if *id == account_id {
                record.last_used = Utc::now();
            }
        }
        Ok(())
    }
}

/// In-memory [`CredentialStore`] that counts lookups, so tests can assert a
/// request was rejected before reaching storage.
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    lookups: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate("email"));
        }
        let created = Account {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            password_hash: account.password_hash,
            organization: account.organization,
            created_at: Utc::now(),
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }
}

/// Convenience used by timestamp assertions.
pub fn minutes_ago(mins: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(mins)
}
