use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{session_age, AuthUser};
use crate::error::ApiError;
use crate::middleware::auth::extract_bearer_token;

/// Guard for sensitive operations that must happen inside a recently
/// established session, independent of the token's own expiry window.
///
/// Recency is measured from the stored record's `created_at`, not from the
/// token claims: a rotated session token keeps the original issuance time.
pub async fn require_fresh_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = state.tokens.verify(&token).ok_or(ApiError::InvalidToken)?;

    let issued_at = state
        .tokens
        .issued_at(claims.account_id)
        .await?
        // No record means the session was revoked out from under the token.
        .ok_or(ApiError::TokenRevoked)?;

    if session_age(issued_at) > state.tokens.fresh_auth_window() {
        return Err(ApiError::FreshAuthRequired);
    }

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
