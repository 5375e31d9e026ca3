use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::config;
use crate::database::models::NewAccount;
use crate::database::store::StoreError;
use crate::error::ApiError;

use super::utils::{is_valid_email, present, MIN_PASSWORD_LENGTH};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub organization: Option<String>,
}

/// POST /auth/signup - create an account and hand out the first token pair.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (first_name, last_name, email, password, organization) = match (
        present(&payload.first_name),
        present(&payload.last_name),
        present(&payload.email),
        present(&payload.password),
        present(&payload.organization),
    ) {
        (Some(f), Some(l), Some(e), Some(p), Some(o)) => (f, l, e, p, o),
        (f, l, e, p, o) => {
            return Err(ApiError::validation(
                "Missing required fields",
                Some(json!({
                    "firstName": f.is_none().then_some("First name is required"),
                    "lastName": l.is_none().then_some("Last name is required"),
                    "email": e.is_none().then_some("Email is required"),
                    "password": p.is_none().then_some("Password is required"),
                    "organization": o.is_none().then_some("Organization is required"),
                })),
            ));
        }
    };

    if !is_valid_email(email) {
        return Err(ApiError::validation(
            "Invalid email format",
            Some(json!("Please enter a valid email address")),
        ));
    }

    // Strength check runs before any storage access.
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(
            "Weak password",
            Some(json!("Password must be at least 8 characters long")),
        ));
    }

    // Pre-emptive duplicate check; the unique constraint below still catches
    // the race between two concurrent signups.
    if state.credentials.find_by_email(email).await?.is_some() {
        return Err(ApiError::conflict(
            "Account already exists",
            Some(json!("This email is already registered")),
        ));
    }

    let password_hash = hash_password(password, config::config().security.bcrypt_cost)?;

    let account = state
        .credentials
        .create(NewAccount {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
            organization: organization.to_string(),
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::conflict(
                "Database conflict",
                Some(json!("This email is already registered")),
            ),
            other => other.into(),
        })?;

    let tokens = state.tokens.issue(&account).await?;

    tracing::info!("account created: {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "accessToken": tokens.access_token,
            "refreshToken": tokens.refresh_token,
            "user": {
                "id": account.id,
                "email": account.email,
                "firstName": account.first_name,
                "lastName": account.last_name,
                "organization": account.organization,
            }
        })),
    ))
}
