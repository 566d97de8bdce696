use todo_api_rust::{app, config, database::manager::DatabaseManager};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    // Idempotent schema setup. A dead database is reported by /health rather
    // than preventing startup.
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::error!("Schema setup failed: {}", e);
    }

    // Allow tests or deployments to override port via env
    let port = std::env::var("TODO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Todo API server listening on http://{}", bind_addr);

    axum::serve(listener, app()).await.expect("server");
}
