// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::service::TokenError;
use crate::database::store::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every variant maps to one entry of the client-facing taxonomy: the
/// envelope is always `{ error, details?, code? }`, and `code` is only
/// present for the token-lifecycle conditions clients branch on.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation { message: String, details: Option<Value> },

    // 401 Unauthorized
    /// No bearer token on a protected request.
    Unauthenticated,
    /// Bad credentials; deliberately identical for unknown email and wrong
    /// password.
    AuthenticationFailed,
    /// Session token past its expiry claim (code TOKEN_EXPIRED).
    TokenExpired,
    /// Session older than the fresh-auth window (code FRESH_AUTH_REQUIRED).
    FreshAuthRequired,
    /// Refresh token failed verification or was superseded; the client must
    /// log in again.
    InvalidRefreshToken,

    // 403 Forbidden
    /// Session token failed cryptographic verification.
    InvalidToken,
    /// Session token no longer matches the one on record (code TOKEN_REVOKED).
    TokenRevoked,

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict { message: String, details: Option<Value> },

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::Unauthenticated => 401,
            ApiError::AuthenticationFailed => 401,
            ApiError::TokenExpired => 401,
            ApiError::FreshAuthRequired => 401,
            ApiError::InvalidRefreshToken => 401,
            ApiError::InvalidToken => 403,
            ApiError::TokenRevoked => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::Internal(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthenticated => "Access denied. No token provided.",
            ApiError::AuthenticationFailed => "Authentication failed",
            ApiError::TokenExpired => "Token has expired.",
            ApiError::FreshAuthRequired => "Fresh authentication required for this operation.",
            ApiError::InvalidRefreshToken => "Invalid refresh token",
            ApiError::InvalidToken => "Invalid or expired token.",
            ApiError::TokenRevoked => "Token has been revoked.",
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict { message, .. } => message,
            ApiError::Internal(_) => "Internal server error",
        }
    }

    /// Machine-readable code for the conditions clients branch on
    /// (revoked -> force re-login, expired -> attempt rotation).
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            ApiError::TokenRevoked => Some("TOKEN_REVOKED"),
            ApiError::TokenExpired => Some("TOKEN_EXPIRED"),
            ApiError::FreshAuthRequired => Some("FRESH_AUTH_REQUIRED"),
            _ => None,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation { details, .. } => details.clone(),
            ApiError::Conflict { details, .. } => details.clone(),
            ApiError::AuthenticationFailed => Some(json!("Invalid email or password")),
            ApiError::InvalidRefreshToken => Some(json!("Please log in again")),
            ApiError::Internal(details) => Some(json!(details)),
            _ => None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({ "error": self.message() });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        if let Some(code) = self.error_code() {
            body["code"] = json!(code);
        }
        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
        ApiError::Validation { message: message.into(), details }
    }

    pub fn conflict(message: impl Into<String>, details: Option<Value>) -> Self {
        ApiError::Conflict { message: message.into(), details }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(details: impl Into<String>) -> Self {
        ApiError::Internal(details.into())
    }
}

// Convert internal error types to ApiError. Storage and crypto failures are
// logged server-side and surfaced with a generic client-facing message.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("store error: {}", err);
        ApiError::internal("An unexpected error occurred. Please try again later.")
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            // Both rotation failures are answered uniformly: re-login.
            TokenError::InvalidRefreshToken | TokenError::RefreshTokenRevoked => {
                ApiError::InvalidRefreshToken
            }
            TokenError::Store(e) => e.into(),
            TokenError::Signing(e) => {
                tracing::error!("token signing error: {}", e);
                ApiError::internal("An unexpected error occurred. Please try again later.")
            }
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("password hashing error: {}", err);
        ApiError::internal("An unexpected error occurred. Please try again later.")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
