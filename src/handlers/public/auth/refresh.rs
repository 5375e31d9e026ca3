use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

use super::utils::present;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// POST /auth/refresh-token - exchange a refresh token for a new session
/// token. Both rotation failures map to the same re-login response.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Value>, ApiError> {
    let refresh_token = present(&payload.refresh_token).ok_or_else(|| {
        ApiError::validation(
            "Missing refresh token",
            Some(json!("Refresh token is required")),
        )
    })?;

    let access_token = state.tokens.rotate(refresh_token).await?;

    Ok(Json(json!({
        "message": "Token refreshed successfully",
        "accessToken": access_token,
    })))
}
