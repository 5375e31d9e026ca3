use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. The password hash never leaves the server:
/// it is skipped on serialization and response shapes are built from the
/// other fields only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub organization: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an account. The caller supplies the id and an
/// already-hashed password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub organization: String,
}
