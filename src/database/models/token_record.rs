use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// The single live token record for an (account, slot) pair.
///
/// A new issuance for the same slot overwrites this row, which is what makes
/// older tokens unverifiable against storage even while still
/// cryptographically valid.
#[derive(Debug, Clone, FromRow)]
pub struct TokenRecord {
    pub account_id: Uuid,
    pub slot: String,
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}
