use syncline_api::app::{self, AppState};
use syncline_api::config;
use syncline_api::database::{schema, DatabaseManager};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Syncline API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        panic!("JWT_SECRET must be set outside development");
    }

    let pool = DatabaseManager::pool()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    schema::ensure_schema(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to prepare database schema: {}", e));

    let app = app::router(AppState::new(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("SYNCLINE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Syncline API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
