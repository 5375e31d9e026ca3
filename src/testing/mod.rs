//! In-memory store implementations and fixtures for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::{TokenConfig, TokenService};
use crate::database::models::{Account, NewAccount, TokenRecord};
use crate::database::store::{CredentialStore, StoreError, TokenStore, DEFAULT_SLOT};

pub const TEST_SECRET: &str = "unit-test-secret";

pub fn test_token_config() -> TokenConfig {
    TokenConfig {
        secret: TEST_SECRET.to_string(),
        refresh_secret: None,
        access_token_ttl: Duration::hours(24),
        refresh_token_ttl: Duration::days(7),
        fresh_auth_window: Duration::minutes(15),
    }
}

pub fn test_token_service() -> (TokenService, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let service = TokenService::new(store.clone(), test_token_config());
    (service, store)
}

pub fn test_account(email: &str, organization: &str) -> Account {
    Account {
        id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password_hash: "$2b$04$invalid-placeholder-hash".to_string(),
        organization: organization.to_string(),
        created_at: Utc::now(),
    }
}

/// HashMap-backed [`TokenStore`] mirroring the Postgres upsert semantics.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: Mutex<HashMap<(Uuid, String), TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current default-slot record, if any.
    pub fn record(&self, account_id: Uuid) -> Option<TokenRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(account_id, DEFAULT_SLOT.to_string()))
            .cloned()
    }

    /// Backdate a session to test recency windows.
    pub fn set_created_at(&self, account_id: Uuid, slot: &str, created_at: DateTime<Utc>) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&(account_id, slot.to_string())) {
            record.created_at = created_at;
        }
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

/// HashMap-backed [`CredentialStore`] that also counts lookups, so tests can
/// assert a request failed before reaching storage.
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    lookups: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

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
