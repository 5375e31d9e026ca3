use axum::Json;
use serde_json::{json, Value};

/// POST /auth/change-password - gated behind the fresh-auth guard.
///
/// The actual credential update is not implemented yet; the endpoint exists
/// so clients can already exercise the fresh-auth flow.
/// TODO: accept {currentPassword, newPassword}, re-verify, and store a new
/// hash via the credential store.
pub async fn change_password() -> Json<Value> {
    Json(json!({
        "message": "Password change endpoint - requires fresh auth"
    }))
}
