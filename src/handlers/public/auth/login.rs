use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::password::verify_password;
use crate::error::ApiError;

use super::utils::present;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - authenticate credentials and issue a token pair.
///
/// The failure payload is identical whether the account does not exist or
/// the password is wrong, so responses carry no enumeration signal.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    // Presence only; password strength is a signup concern.
    let (email, password) = match (present(&payload.email), present(&payload.password)) {
        (Some(e), Some(p)) => (e, p),
        (e, p) => {
            return Err(ApiError::validation(
                "Missing credentials",
                Some(json!({
                    "email": e.is_none().then_some("Email is required"),
                    "password": p.is_none().then_some("Password is required"),
                })),
            ));
        }
    };

    let account = state
        .credentials
        .find_by_email(email)
        .await?
        .ok_or(ApiError::AuthenticationFailed)?;

    if !verify_password(password, &account.password_hash)? {
        return Err(ApiError::AuthenticationFailed);
    }

    let tokens = state.tokens.issue(&account).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "accessToken": tokens.access_token,
        "refreshToken": tokens.refresh_token,
        "user": {
            "id": account.id,
            "email": account.email,
            "firstName": account.first_name,
            "lastName": account.last_name,
            "organization": account.organization,
        }
    })))
}
