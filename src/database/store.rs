use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Account, NewAccount, TokenRecord};

/// Slot holding the primary login session. Other slot values are reserved
/// for third-party integration credentials.
pub const DEFAULT_SLOT: &str = "default";

/// Errors from the storage contracts
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Lookup and creation of account credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is already
    /// registered.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;
}

/// Persistence of the per-(account, slot) token record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert or replace the record for (account, slot). Replacing resets
    /// `created_at`, so a re-login restarts the fresh-auth window.
    async fn upsert(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StoreError>;

    async fn find(&self, account_id: Uuid, slot: &str) -> Result<Option<TokenRecord>, StoreError>;

    /// Swap in a rotated access token, leaving the refresh token and
    /// `created_at` untouched.
    async fn update_access_token(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
    ) -> Result<(), StoreError>;

    /// Delete the record for every slot of the account. Idempotent.
    async fn delete(&self, account_id: Uuid) -> Result<(), StoreError>;

    async fn touch_last_used(&self, account_id: Uuid) -> Result<(), StoreError>;
}
