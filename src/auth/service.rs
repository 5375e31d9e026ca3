use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AccessClaims, RefreshClaims, TokenConfig};
use crate::database::models::Account;
use crate::database::store::{StoreError, TokenStore, DEFAULT_SLOT};

/// Token lifecycle failures. The two rotation variants stay distinct so
/// callers can tell a cryptographically bad token from a superseded one.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("refresh token has been revoked")]
    RefreshTokenRevoked,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Both tokens handed out on login/signup.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, verifies, rotates and revokes session tokens; owns all
/// token-lifecycle policy.
///
/// Signature verification and storage-backed revocation are separate checks
/// on purpose: a cryptographically valid but superseded token must still be
/// rejected, which is the only way logout and single-session enforcement can
/// work with stateless-looking tokens.
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn TokenStore>,
    config: TokenConfig,
}

impl TokenService {
    pub fn new(store: Arc<dyn TokenStore>, config: TokenConfig) -> Self {
        Self { store, config }
    }

    fn refresh_secret(&self) -> &str {
        self.config.refresh_secret.as_deref().unwrap_or(&self.config.secret)
    }

    fn sign_access(
        &self,
        account_id: Uuid,
        email: &str,
        organization: &str,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims::new(
            account_id,
            email.to_string(),
            organization.to_string(),
            self.config.access_token_ttl,
        );
        let key = EncodingKey::from_secret(self.config.secret.as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }

    fn sign_refresh(
        &self,
        account_id: Uuid,
        email: &str,
        organization: &str,
    ) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(
            account_id,
            email.to_string(),
            organization.to_string(),
            self.config.refresh_token_ttl,
        );
        let key = EncodingKey::from_secret(self.refresh_secret().as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }

    /// Issue a fresh token pair for the account and persist it under the
    /// default slot, overwriting any prior record for that slot.
    pub async fn issue(&self, account: &Account) -> Result<TokenPair, TokenError> {
        let access_token = self.sign_access(account.id, &account.email, &account.organization)?;
        let refresh_token = self.sign_refresh(account.id, &account.email, &account.organization)?;

        self.store
            .upsert(account.id, DEFAULT_SLOT, &access_token, &refresh_token)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Cryptographic signature + expiry check only; storage is not
    /// consulted. Any malformed, expired or tampered token yields `None`.
    pub fn verify(&self, token: &str) -> Option<AccessClaims> {
        let key = DecodingKey::from_secret(self.config.secret.as_bytes());
        decode::<AccessClaims>(token, &key, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }

    fn verify_refresh(&self, token: &str) -> Option<RefreshClaims> {
        let key = DecodingKey::from_secret(self.refresh_secret().as_bytes());
        decode::<RefreshClaims>(token, &key, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }

    /// Compare the presented session token against the one on record for the
    /// default slot; a mismatch or missing record means revoked.
    pub async fn is_revoked(&self, account_id: Uuid, token: &str) -> Result<bool, TokenError> {
        let record = self.store.find(account_id, DEFAULT_SLOT).await?;
        Ok(!matches!(record, Some(r) if r.access_token == token))
    }

    /// Decode the expiry claim without verifying the signature and compare
    /// it to now. Decode failures count as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        match decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
            Ok(data) => data.claims.exp < Utc::now().timestamp(),
            Err(_) => true,
        }
    }

    /// Exchange a refresh token for a new session token.
    ///
    /// The refresh token itself is reused until its own expiry; only the
    /// session token on the record changes.
    pub async fn rotate(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self
            .verify_refresh(refresh_token)
            .ok_or(TokenError::InvalidRefreshToken)?;

        let record = self.store.find(claims.account_id, DEFAULT_SLOT).await?;
        match record {
            Some(r) if r.refresh_token == refresh_token => {}
            // A newer login has overwritten the record, or it was deleted.
            _ => return Err(TokenError::RefreshTokenRevoked),
        }

        let access_token =
            self.sign_access(claims.account_id, &claims.email, &claims.organization)?;
        self.store
            .update_access_token(claims.account_id, DEFAULT_SLOT, &access_token)
            .await?;

        Ok(access_token)
    }

    /// Delete the token record for the account across all slots. Idempotent.
    pub async fn revoke(&self, account_id: Uuid) -> Result<(), TokenError> {
        self.store.delete(account_id).await?;
        Ok(())
    }

    /// When the current default-slot session was established, if any.
    pub async fn issued_at(&self, account_id: Uuid) -> Result<Option<DateTime<Utc>>, TokenError> {
        let record = self.store.find(account_id, DEFAULT_SLOT).await?;
        Ok(record.map(|r| r.created_at))
    }

    pub async fn touch_last_used(&self, account_id: Uuid) -> Result<(), TokenError> {
        self.store.touch_last_used(account_id).await?;
        Ok(())
    }

    pub fn fresh_auth_window(&self) -> chrono::Duration {
        self.config.fresh_auth_window
    }
}
