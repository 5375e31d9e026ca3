use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{TokenConfig, TokenService};
use crate::config;
use crate::database::accounts::PgCredentialStore;
use crate::database::store::CredentialStore;
use crate::database::tokens::PgTokenStore;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware as guards;

/// Shared per-request state: the credential store and the token service.
///
/// Handlers and guards only ever see the storage contracts, never the pool,
/// so tests swap in in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let token_config = TokenConfig::from_security(&config::config().security);
        Self::with_stores(
            Arc::new(PgCredentialStore::new(pool.clone())),
            TokenService::new(Arc::new(PgTokenStore::new(pool)), token_config),
        )
    }

    pub fn with_stores(credentials: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self {
            credentials,
            tokens,
        }
    }
}

pub fn router(state: AppState) -> Router {
    use tower_http::{cors::CorsLayer, trace::TraceLayer};

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(public_auth_routes(state.clone()))
        // Protected auth routes (guarded)
        .merge(protected_auth_routes(state))
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(public::auth::signup))
        .route("/auth/login", post(public::auth::login))
        .route("/auth/refresh-token", post(public::auth::refresh))
        .with_state(state)
}

fn protected_auth_routes(state: AppState) -> Router {
    // Standard guard: verify + revocation + expiry
    let standard = Router::new()
        .route("/auth/validate-token", get(protected::auth::validate_token))
        .route("/auth/profile", get(protected::auth::profile))
        .route("/auth/logout", post(protected::auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_auth,
        ));

    // Fresh-auth guard: session must have been established recently
    let fresh = Router::new()
        .route("/auth/change-password", post(protected::auth::change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_fresh_auth,
        ));

    standard.merge(fresh).with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Syncline API",
        "version": version,
        "description": "Data-integration backend API (accounts, sessions, token lifecycle)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "signup": "POST /auth/signup (public)",
            "login": "POST /auth/login (public)",
            "refresh": "POST /auth/refresh-token (public)",
            "validate": "GET /auth/validate-token (protected)",
            "profile": "GET /auth/profile (protected)",
            "logout": "POST /auth/logout (protected)",
            "change_password": "POST /auth/change-password (protected, fresh auth)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": "database unavailable",
                "details": e.to_string()
            })),
        ),
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
