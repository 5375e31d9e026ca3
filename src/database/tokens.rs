use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::TokenRecord;
use crate::database::store::{StoreError, TokenStore};

/// Postgres-backed [`TokenStore`].
///
/// The unique (account_id, slot) constraint plus the atomic upsert is the
/// only concurrency control: two concurrent logins race at the database and
/// the later write wins, which is the intended single-session-per-slot
/// semantic.
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn upsert(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO account_tokens (account_id, slot, access_token, refresh_token, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (account_id, slot)
            DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                created_at = NOW()
            "#,
        )
        .bind(account_id)
        .bind(slot)
        .bind(access_token)
        .bind(refresh_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, account_id: Uuid, slot: &str) -> Result<Option<TokenRecord>, StoreError> {
        let record = sqlx::query_as::<_, TokenRecord>(
            r#"
            SELECT account_id, slot, access_token, refresh_token, created_at, last_used
            FROM account_tokens
            WHERE account_id = $1 AND slot = $2
            "#,
        )
        .bind(account_id)
        .bind(slot)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_access_token(
        &self,
        account_id: Uuid,
        slot: &str,
        access_token: &str,
    ) -> Result<(), StoreError> {
        // created_at is deliberately left alone: rotation does not re-open
        // the fresh-auth window.
        sqlx::query(
            r#"
            UPDATE account_tokens
            SET access_token = $3
            WHERE account_id = $1 AND slot = $2
            "#,
        )
        .bind(account_id)
        .bind(slot)
        .bind(access_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM account_tokens WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn touch_last_used(&self, account_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE account_tokens SET last_used = NOW() WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
