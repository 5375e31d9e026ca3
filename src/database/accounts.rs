use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Account, NewAccount};
use crate::database::store::{CredentialStore, StoreError};

// PostgreSQL "unique_violation"
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed [`CredentialStore`]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, organization, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, first_name, last_name, email, password_hash, organization)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, password_hash, organization, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.organization)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Duplicate("email")
            }
            _ => StoreError::Sqlx(e),
        })?;

        Ok(created)
    }
}
