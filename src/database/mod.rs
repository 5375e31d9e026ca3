pub mod accounts;
pub mod manager;
pub mod models;
pub mod schema;
pub mod store;
pub mod tokens;

pub use manager::{DatabaseError, DatabaseManager};
pub use store::{CredentialStore, StoreError, TokenStore, DEFAULT_SLOT};
