use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

/// Standard authentication guard for protected routes.
///
/// Check order matters: revocation runs before the expiry probe so a
/// revoked-but-unexpired token reports TOKEN_REVOKED rather than slipping
/// through as merely expired. The expiry probe after a successful signature
/// check exists to turn an exp failure inside the verifier's leeway into the
/// specific TOKEN_EXPIRED code instead of a bare verification failure.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = state.tokens.verify(&token).ok_or(ApiError::InvalidToken)?;

    if state.tokens.is_revoked(claims.account_id, &token).await? {
        return Err(ApiError::TokenRevoked);
    }

    if state.tokens.is_expired(&token) {
        return Err(ApiError::TokenExpired);
    }

    // Best-effort bookkeeping; an authenticated request never fails on it.
    if let Err(e) = state.tokens.touch_last_used(claims.account_id).await {
        tracing::warn!("failed to update last_used for {}: {}", claims.account_id, e);
    }

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
///
/// Missing and malformed headers are indistinguishable to the client.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthenticated)?;

    Ok(token.to_string())
}
