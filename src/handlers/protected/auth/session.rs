use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

/// GET /auth/validate-token - reachable only through the standard guard, so
/// arriving here means the token passed every check.
pub async fn validate_token(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "valid": true,
        "user": user,
    }))
}

/// GET /auth/profile - the authenticated account context as the guard saw it.
pub async fn profile(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({ "user": user }))
}

/// POST /auth/logout - revoke the account's token record (all slots).
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    state.tokens.revoke(user.account_id).await?;

    tracing::info!("session revoked: {}", user.account_id);

    Ok(Json(json!({ "message": "Logged out successfully" })))
}
