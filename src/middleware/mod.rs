pub mod auth;
pub mod fresh_auth;

pub use auth::require_auth;
pub use fresh_auth::require_fresh_auth;
